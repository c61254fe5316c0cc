use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpcatError {
    #[error("Episode not found: {0}")]
    FlagTargetNotFound(String),

    #[error("Failed to fetch page {page}: {message}")]
    FetchFailed { page: u32, message: String },

    #[error("Source error: {0}")]
    Source(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, EpcatError>;
