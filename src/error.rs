//! Error types for quoting, storage and configuration

use thiserror::Error;

/// Result type alias using QuoteError
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Unified error type for the underwriting engine
///
/// An empty lookup is not an error; it routes the estimator to the fallback model.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The historical rates store could not be reached or queried
    #[error("Historical rate lookup unavailable: {0}")]
    LookupUnavailable(String),

    /// The fallback model could not be loaded, is not configured, or failed to predict
    #[error("Fallback model unavailable: {0}")]
    ModelUnavailable(String),

    /// The results store rejected the write
    #[error("Failed to persist quote: {0}")]
    PersistenceFailure(String),

    /// The request was rejected before any computation
    #[error("Invalid input '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Historical data could not be loaded into the rates store
    #[error("Ingest error: {0}")]
    Ingest(String),
}

impl QuoteError {
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        QuoteError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
