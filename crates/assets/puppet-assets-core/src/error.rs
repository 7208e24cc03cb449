use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("missing asset '{path}'")]
    MissingAsset { path: String },
    #[error("invalid settings document '{path}': {reason}")]
    InvalidSettings { path: String, reason: String },
    #[error("unreadable container: {reason}")]
    Archive { reason: String },
    #[error("failed to decode '{path}': {reason}")]
    DecodeFailure { path: String, reason: String },
    #[error("fetch of '{reference}' failed: {reason}")]
    Fetch { reference: String, reason: String },
}
