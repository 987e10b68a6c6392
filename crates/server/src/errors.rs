use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage setup failed: {0}")]
    Storage(String),
    #[error("database setup failed: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
