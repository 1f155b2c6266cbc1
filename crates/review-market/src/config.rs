//! Configuration for market data fetching

use crate::error::{MarketError, Result};
use std::time::Duration;

/// Public EastMoney quote API
pub const DEFAULT_BASE_URL: &str = "https://push2.eastmoney.com";

/// Configuration for the market data client
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Base URL of the quote API
    pub base_url: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Rows per page when walking the full A-share list
    pub page_size: u32,

    /// Upper bound on pages walked for market breadth
    pub max_pages: u32,

    /// Percent move counted as limit-up / limit-down
    pub limit_threshold: f64,

    /// Number of gaining boards kept
    pub top_sectors: usize,

    /// Number of losing boards kept
    pub bottom_sectors: usize,

    /// Entries kept on each side of the capital flow ranking
    pub flow_rank_size: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            page_size: 100,
            max_pages: 80,
            limit_threshold: 9.9,
            top_sectors: 10,
            bottom_sectors: 5,
            flow_rank_size: 10,
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(MarketError::ConfigError(
                "page_size must be greater than 0".to_string(),
            ));
        }

        if self.max_pages == 0 {
            return Err(MarketError::ConfigError(
                "max_pages must be greater than 0".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(MarketError::ConfigError(format!(
                "base_url must be http(s): {}",
                self.base_url
            )));
        }

        Ok(())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    page_size: Option<u32>,
    max_pages: Option<u32>,
    limit_threshold: Option<f64>,
}

impl MarketConfigBuilder {
    /// Set the quote API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set rows per page
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the page walk limit
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Set the limit-up/limit-down threshold
    pub fn limit_threshold(mut self, threshold: f64) -> Self {
        self.limit_threshold = Some(threshold);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            max_pages: self.max_pages.unwrap_or(defaults.max_pages),
            limit_threshold: self.limit_threshold.unwrap_or(defaults.limit_threshold),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarketConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.top_sectors, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_trims_base_url() {
        let config = MarketConfig::builder()
            .base_url("http://127.0.0.1:8080/")
            .page_size(50)
            .build()
            .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_invalid_config() {
        assert!(MarketConfig::builder().page_size(0).build().is_err());
        assert!(MarketConfig::builder().base_url("ftp://x").build().is_err());
    }
}
