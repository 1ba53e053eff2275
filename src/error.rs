use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HumanizerError {
    #[error("input text is empty")]
    EmptyInput,
    #[error("no text has been processed yet")]
    NothingProcessed,
    #[error("language resource `{resource}` is unavailable: {reason}")]
    ResourceUnavailable { resource: String, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pattern(#[from] regex::Error),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl HumanizerError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::NothingProcessed | Self::ResourceUnavailable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HumanizerError>;
