//! Runtime options. Deserializable from camelCase JSON; every field has a
//! default so partial documents are fine.

use puppet_animation_core::AnimationConfig;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraLimits, CameraState};

/// Per-layer switches of the frame pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureFlags {
    pub enable_motion: bool,
    pub enable_expression: bool,
    pub enable_eye_blink: bool,
    pub enable_breath: bool,
    pub enable_movement: bool,
    pub enable_physics: bool,
    pub enable_pose: bool,
    pub enable_lipsync: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::all()
    }
}

impl FeatureFlags {
    pub fn all() -> Self {
        Self {
            enable_motion: true,
            enable_expression: true,
            enable_eye_blink: true,
            enable_breath: true,
            enable_movement: true,
            enable_physics: true,
            enable_pose: true,
            enable_lipsync: true,
        }
    }

    pub fn none() -> Self {
        Self {
            enable_motion: false,
            enable_expression: false,
            enable_eye_blink: false,
            enable_breath: false,
            enable_movement: false,
            enable_physics: false,
            enable_pose: false,
            enable_lipsync: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeOptions {
    /// Keep requesting frames after load.
    pub auto_animate: bool,
    /// React to taps on `Head` / `Body` regions.
    pub auto_interaction: bool,
    pub tap_interaction: bool,
    /// Idle fallback picks any group instead of `Idle`.
    pub random_motion: bool,
    pub keep_aspect: bool,
    pub paused: bool,
    pub speed: f32,
    pub scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub pan_speed: f32,
    pub zoom_step: f32,
    pub x: f32,
    pub y: f32,
    pub zoom_enabled: bool,
    pub enable_pan: bool,
    pub double_click_reset: bool,
    pub check_consistency: bool,
    pub premultiplied_alpha: bool,
    pub lipsync_smoothing: f32,
    pub volume: f32,
    pub autoplay_voice: bool,
    pub max_texture_size: Option<u32>,
    /// Seed for idle selection, blinking and tap reactions. Entropy when unset.
    pub rng_seed: Option<u64>,
    #[serde(flatten)]
    pub features: FeatureFlags,
    pub animation: AnimationConfig,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            auto_animate: true,
            auto_interaction: true,
            tap_interaction: true,
            random_motion: true,
            keep_aspect: false,
            paused: false,
            speed: 1.0,
            scale: 1.0,
            min_scale: 0.1,
            max_scale: 10.0,
            pan_speed: 1.0,
            zoom_step: 0.005,
            x: 0.0,
            y: 0.0,
            zoom_enabled: true,
            enable_pan: true,
            double_click_reset: true,
            check_consistency: true,
            premultiplied_alpha: true,
            lipsync_smoothing: 0.1,
            volume: 1.0,
            autoplay_voice: true,
            max_texture_size: None,
            rng_seed: None,
            features: FeatureFlags::all(),
            animation: AnimationConfig::default(),
        }
    }
}

impl RuntimeOptions {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn camera_state(&self) -> CameraState {
        CameraState {
            x: self.x,
            y: self.y,
            scale: self.scale,
        }
    }

    pub fn camera_limits(&self) -> CameraLimits {
        CameraLimits {
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            zoom_step: self.zoom_step,
            pan_speed: self.pan_speed,
            zoom_enabled: self.zoom_enabled,
            enable_pan: self.enable_pan,
            double_click_reset: self.double_click_reset,
        }
    }
}
