//! Error types for report generation and delivery

use review_llm::LLMError;
use review_market::MarketError;
use thiserror::Error;

/// Report pipeline errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Market configuration or prompt rendering failed
    #[error("Market data error: {0}")]
    Market(#[from] MarketError),

    /// Model setup failed; exhausted fallback is handled by the generator
    #[error("Model error: {0}")]
    Llm(#[from] LLMError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Email delivery errors
///
/// Delivery problems are reported to the operator but never fail a run
/// whose report has already been saved.
#[derive(Debug, Error)]
pub enum MailError {
    /// Sender address or password is not configured
    #[error("SENDER_EMAIL and SENDER_PASSWORD must be set to send email")]
    MissingCredentials,

    /// Malformed sender or recipient address
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Malformed MIME content type
    #[error("Invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    /// SMTP connection, authentication or submission failed
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Report file could not be read
    #[error("Failed to read report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::Llm(LLMError::NoProvidersConfigured);
        assert!(err.to_string().starts_with("Model error:"));

        let err = MailError::MissingCredentials;
        assert_eq!(
            err.to_string(),
            "SENDER_EMAIL and SENDER_PASSWORD must be set to send email"
        );
    }
}
