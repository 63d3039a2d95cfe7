// lib/src/errors.rs

use bincode::error::{DecodeError, EncodeError};
use models::ValidationError;
use security::{AccessError, AuthError};
use sled::transaction::TransactionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CareError {
    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Already Exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Reference data could not be saved: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Bincode decode error: {0}")]
    BincodeDecode(#[from] DecodeError),

    #[error("Bincode encode error: {0}")]
    BincodeEncode(#[from] EncodeError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type CareResult<T> = std::result::Result<T, CareError>;

impl From<sled::Error> for CareError {
    fn from(err: sled::Error) -> Self {
        CareError::DatabaseError(err.to_string())
    }
}

impl From<TransactionError<CareError>> for CareError {
    fn from(err: TransactionError<CareError>) -> Self {
        match err {
            TransactionError::Abort(inner) => inner,
            TransactionError::Storage(e) => CareError::DatabaseError(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for CareError {
    fn from(err: tokio::task::JoinError) -> Self {
        CareError::InternalError(format!("Async task join error: {}", err))
    }
}

impl From<serde_yaml::Error> for CareError {
    fn from(err: serde_yaml::Error) -> Self {
        CareError::ConfigurationError(err.to_string())
    }
}
