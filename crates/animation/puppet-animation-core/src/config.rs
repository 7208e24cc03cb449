//! Tunables for the animation layers.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Fade used by expressions whose document omits `FadeInTime`.
    pub expression_fade_in: f32,
    pub expression_fade_out: f32,
    /// Fade applied to motion clips that declare none.
    pub motion_fade_in: f32,
    pub motion_fade_out: f32,
    /// Decode every clip up front instead of on first use.
    pub preload_motions: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            expression_fade_in: 1.0,
            expression_fade_out: 1.0,
            motion_fade_in: 1.0,
            motion_fade_out: 1.0,
            preload_motions: true,
        }
    }
}
