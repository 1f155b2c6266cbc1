//! Run configuration

use crate::{ReportError, Result};
use review_llm::ProviderDescriptor;
use review_llm::descriptor::DEFAULT_TIMEOUT_SECS;
use review_market::MarketConfig;
use review_utils::{env_lookup, lookup_nonempty, lookup_parse};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_OUTPUT_DIR: &str = "reports";
/// Log directory used when `LOG_DIR` is unset
pub const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Everything a report run needs, read once at start-up
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Model descriptors in fallback order
    pub providers: Vec<ProviderDescriptor>,
    /// Vendor tried ahead of the normal order
    pub preferred_model: Option<String>,
    /// Per-call model timeout
    pub ai_timeout: Duration,
    /// Directory reports are written to
    pub output_dir: PathBuf,
    /// Delivery address; `None` skips email
    pub recipient: Option<String>,
    pub mail: MailConfig,
    pub market: MarketConfig,
    /// Directory of the daily log file
    pub log_dir: PathBuf,
}

/// SMTP submission settings
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub sender: Option<String>,
    pub password: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SMTP_SERVER.to_string(),
            port: DEFAULT_SMTP_PORT,
            sender: None,
            password: None,
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl MailConfig {
    /// Read SMTP settings through `lookup`
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server: lookup_nonempty(lookup, "SMTP_SERVER")
                .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            port: lookup_parse(lookup, "SMTP_PORT", DEFAULT_SMTP_PORT),
            sender: lookup_nonempty(lookup, "SENDER_EMAIL"),
            password: lookup_nonempty(lookup, "SENDER_PASSWORD"),
        }
    }

    /// Whether both sender address and password are present
    pub fn has_credentials(&self) -> bool {
        self.sender.is_some() && self.password.is_some()
    }
}

impl ReviewConfig {
    /// Load from the process environment
    ///
    /// Call `dotenvy` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&env_lookup)
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ai_timeout = Duration::from_secs(lookup_parse(
            lookup,
            "AI_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        ));
        if ai_timeout.is_zero() {
            return Err(ReportError::Config(
                "AI_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        let providers = ProviderDescriptor::from_lookup(lookup, ai_timeout)?;

        let mut market = MarketConfig::builder();
        if let Some(base) = lookup_nonempty(lookup, "MARKET_API_BASE") {
            market = market.base_url(base);
        }

        Ok(Self {
            providers,
            preferred_model: lookup_nonempty(lookup, "PREFERRED_MODEL"),
            ai_timeout,
            output_dir: lookup_nonempty(lookup, "REPORT_OUTPUT_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from),
            recipient: lookup_nonempty(lookup, "RECIPIENT_EMAIL"),
            mail: MailConfig::from_lookup(lookup),
            market: market.build()?,
            log_dir: lookup_nonempty(lookup, "LOG_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from),
        })
    }
}
