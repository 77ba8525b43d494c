use thiserror::Error;

use crate::validate::ValidationErrors;

/// Failures of the underlying key-value store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage read failed: {0}")]
    Read(String),

    #[error("Storage write failed: {0}")]
    Write(String),

    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors returned by record store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No record at position {position} (have {len})")]
    IndexOutOfRange { position: usize, len: usize },

    #[error("No edit in progress")]
    NoActiveEdit,

    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// The validation errors, if this is a validation failure
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            StoreError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// The persisted blob could not be read as a record collection
#[derive(Error, Debug)]
#[error("Corrupt stored state: {0}")]
pub struct CorruptState(pub String);

pub type Result<T> = std::result::Result<T, StoreError>;
