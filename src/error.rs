//! Error taxonomy
//!
//! Only conditions the caller must act on are errors. Stale piece ids and
//! exhausted hints are absorbed by the reducer as no-ops.

#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    /// Bad arguments to puzzle initialization (empty image, bad canvas)
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("settings file unreadable: {0}")]
    SettingsIo(#[from] std::io::Error),
    #[error("settings file malformed: {0}")]
    SettingsFormat(#[from] serde_json::Error),
    /// A collaborator (audio, etc.) failed to start
    #[error("collaborator failed: {0}")]
    Collaborator(String),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
