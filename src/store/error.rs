use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by the storage layer. All of them map to HTTP 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cast to id failed for value \"{0}\"")]
    InvalidId(String),

    #[error("document validation failed: {0}")]
    Validation(String),

    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Stable error kind, serialized as `name` in 500 responses.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "InvalidIdError",
            Self::Validation(_) => "ValidationError",
            Self::Io(_) => "StorageIoError",
            Self::Serialization(_) => "SerializationError",
        }
    }
}
