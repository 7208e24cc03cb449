use thiserror::Error;

use crate::ids::MotionHandle;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{document} document: {reason}")]
pub struct ClipDecodeError {
    pub document: &'static str,
    pub reason: String,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("priority rejected: an equal or higher priority motion is playing or reserved")]
    PriorityRejected,
    #[error("motion group '{group}' not found")]
    GroupNotFound { group: String },
    #[error("motion group '{group}' is empty")]
    EmptyGroup { group: String },
    #[error("no motion groups declared")]
    NoGroups,
    #[error("motion '{group}' #{index} not found")]
    ClipNotFound { group: String, index: usize },
    #[error("expression '{name}' not found")]
    ExpressionNotFound { name: String },
    #[error(transparent)]
    Decode(#[from] ClipDecodeError),
    #[error("playback disabled")]
    Disabled,
}

impl PlaybackError {
    /// Handle callers receive in place of a queued motion.
    pub fn handle(&self) -> MotionHandle {
        MotionHandle::INVALID
    }
}
