use thiserror::Error;

/// Every way a storage command can be rejected. Rejections never leave
/// partial state behind.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("No storage allocated")]
    NoAllocation,

    #[error("Insufficient storage: need {requested} bytes, {available} bytes free")]
    InsufficientAllocation { requested: u64, available: u64 },

    #[error("Cannot deactivate while files are stored")]
    HasStoredData,

    #[error("Allocation of {requested} bytes is below the {used} bytes in use")]
    AllocationBelowUsage { requested: u64, used: u64 },

    #[error("Allocation of {0} GB is outside the allowed range")]
    AllocationOutOfRange(u64),

    #[error("Already active as a storage provider")]
    AlreadyProvider,

    #[error("Not an active storage provider")]
    NotProvider,

    #[error("Another upload is still in progress")]
    UploadInProgress,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Store(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
