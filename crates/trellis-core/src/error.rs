use thiserror::Error;

/// Core error types for Trellis protocol values
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid bytecode payload: {0}")]
    InvalidBytecode(String),

    #[error("Invalid response status code: {0}")]
    InvalidStatusCode(u16),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),
}

impl CoreError {
    /// Create a new InvalidBytecode error
    pub fn invalid_bytecode(message: impl Into<String>) -> Self {
        Self::InvalidBytecode(message.into())
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
