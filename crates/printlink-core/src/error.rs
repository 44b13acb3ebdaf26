use printlink_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no OctoPrint instances configured; add one in Settings → OctoPrint")]
    NoInstancesConfigured,
    #[error("no instance matches `{id}`")]
    RecordNotFound { id: String },
    #[error(transparent)]
    Persistence(#[from] StoreError),
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("send to {target} failed: {reason}")]
    Dispatch { target: String, reason: String },
}

impl Error {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::RecordNotFound { id: id.into() }
    }
}
