//! Error types for market data operations

use thiserror::Error;

/// Market data and prompt rendering errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// The quote API answered with an error or an empty payload
    #[error("API error: {0}")]
    ApiError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Prompt template failed to compile or render
    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;
