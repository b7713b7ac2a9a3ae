use storage::error::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("LeetCode user '{0}' not found")]
    ExternalUserNotFound(String),

    #[error("Stats provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("A full sync is already running")]
    SyncInProgress,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for SyncError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::MalformedResponse(error.to_string())
        } else {
            Self::ProviderUnavailable(error.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedResponse(error.to_string())
    }
}

impl SyncError {
    /// Failures worth retrying later; enrollment defers the baseline on these.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_) | Self::MalformedResponse(_)
        )
    }
}
