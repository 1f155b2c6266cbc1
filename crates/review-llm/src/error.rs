//! Error types for LLM operations

use thiserror::Error;

/// Result type for fallback-level operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Result type for a single provider call
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// A single vendor call failed
///
/// Transport and API-level failures are deliberately not ranked: the
/// fallback manager reacts to every variant the same way.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection, timeout or body-read failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx response whose body did not have the expected shape
    #[error("unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Client could not be built from its configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// HTTP status code, when the vendor answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body, when one was received
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// One failed attempt recorded by the fallback manager
#[derive(Debug)]
pub struct ProviderAttempt {
    /// Provider name
    pub provider: String,
    /// Why it failed
    pub error: ProviderError,
}

/// Errors surfaced by the AI-generation phase
#[derive(Error, Debug)]
pub enum LLMError {
    /// No credential slot is filled; nothing can be called
    #[error(
        "no AI provider configured; set at least one of GEMINI_API_KEY, STEPFUN_API_KEY, DEEPSEEK_API_KEY"
    )]
    NoProvidersConfigured,

    /// Every configured provider failed for this request
    #[error("all AI providers failed after {} attempts; check API keys and network", .0.len())]
    AllProvidersFailed(Vec<ProviderAttempt>),

    /// A descriptor override could not be used
    #[error("invalid configuration for {provider}: {detail}")]
    InvalidDescriptor { provider: String, detail: String },

    /// Direct provider call outside the fallback loop
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_keeps_status_and_body() {
        let err = ProviderError::Http {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.body(), Some("quota exceeded"));
        assert_eq!(err.to_string(), "HTTP 429: quota exceeded");
    }

    #[test]
    fn test_unexpected_response_has_no_status() {
        let err = ProviderError::UnexpectedResponse("no choices".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
    }

    #[test]
    fn test_all_failed_counts_attempts() {
        let err = LLMError::AllProvidersFailed(vec![
            ProviderAttempt {
                provider: "Gemini".to_string(),
                error: ProviderError::UnexpectedResponse("empty".to_string()),
            },
            ProviderAttempt {
                provider: "StepFun".to_string(),
                error: ProviderError::Http {
                    status: 401,
                    body: String::new(),
                },
            },
        ]);
        assert!(err.to_string().contains("after 2 attempts"));
    }
}
