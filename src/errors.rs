use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Already in portfolio")]
    Duplicate,
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("External error: {0}")]
    External(String),
}

impl AppError {
    /// Failures that the caller should retry on the next cycle rather than
    /// surface to the user.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::External(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        AppError::Network(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Parse(value.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Storage(value.to_string())
    }
}

impl From<PriceProviderError> for AppError {
    fn from(value: PriceProviderError) -> Self {
        match value {
            PriceProviderError::Network(msg) => AppError::Network(msg),
            PriceProviderError::Parse(msg) => AppError::Parse(msg),
            other => AppError::External(other.to_string()),
        }
    }
}
