use std::io;
use std::path::PathBuf;

pub type TrackerResult<T> = Result<T, TrackerError>;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("{0}")]
    Validation(String),
    #[error("stored data under '{key}' is corrupted: {source}")]
    DataCorruption {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage quota exceeded while writing '{key}' ({needed} bytes needed, {quota} allowed)")]
    StorageQuotaExceeded { key: String, needed: u64, quota: u64 },
    #[error("failed to read '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("{0}")]
    Terminal(String),
}

impl TrackerError {
    pub fn validation(message: impl Into<String>) -> Self {
        TrackerError::Validation(message.into())
    }

    pub fn corrupted(key: &str, source: serde_json::Error) -> Self {
        TrackerError::DataCorruption {
            key: key.to_string(),
            source,
        }
    }
}
