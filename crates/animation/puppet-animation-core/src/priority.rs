use serde::{Deserialize, Serialize};

/// Ordered playback priority. `None` means "nothing playing / reserved".
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum PlaybackPriority {
    #[default]
    None,
    Idle,
    Normal,
    Force,
}

impl PlaybackPriority {
    pub fn as_index(self) -> u8 {
        self as u8
    }
}
