use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("model error: {0}")]
    Model(models::errors::ModelError),
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::Validation(msg),
            other => Self::Model(other),
        }
    }
}

/// Failures reported by the table/blob/queue/file backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    Conflict(String),
    #[error("etag mismatch for {0}")]
    PreconditionFailed(String),
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("content is {actual} bytes but {declared} were declared")]
    SizeExceeded { declared: u64, actual: u64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
