use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeberError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("No image data found in response.")]
    NoImageProduced,
    #[error("Failed to generate image. Please check the logs for details.")]
    GenerationFailed,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WeberError {
    /// Errors raised before any request leaves the process.
    pub fn is_validation(&self) -> bool {
        matches!(self, WeberError::ValidationError(_))
    }
}

pub type Result<T> = std::result::Result<T, WeberError>;
