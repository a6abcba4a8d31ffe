use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// store could not be opened or connected at construction
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// a live lookup raised a backend error
    #[error("lookup failed: {0}")]
    Lookup(String),
    /// a stored posting value could not be decoded
    #[error("malformed posting list: {0}")]
    Decode(String),
    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<redb::TransactionError> for StoreError {
    fn from(e: redb::TransactionError) -> Self {
        StoreError::Lookup(e.to_string())
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(e: redb::StorageError) -> Self {
        StoreError::Lookup(e.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(e.to_string()),
            _ => StoreError::Lookup(e.to_string()),
        }
    }
}

impl From<bincode::Error> for StoreError {
    fn from(e: bincode::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}
