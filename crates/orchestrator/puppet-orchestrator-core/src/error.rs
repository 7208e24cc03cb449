use puppet_animation_core::PlaybackError;
use puppet_api_core::{AudioError, EngineError};
use puppet_assets_core::LoadError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    #[error("no model is loaded")]
    NotLoaded,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error("audio failed: {reason}")]
    Audio { reason: String },
    #[error("runtime has been destroyed")]
    Destroyed,
}

impl From<AudioError> for RuntimeError {
    fn from(e: AudioError) -> Self {
        RuntimeError::Audio { reason: e.reason }
    }
}
