//! Shared utilities for market-review
//!
//! This crate provides common functionality used across the market-review
//! workspace: logging setup, environment lookups and the exchange clock.

pub mod clock;
pub mod config;
pub mod logging;

pub use clock::{beijing_now, beijing_today};
pub use config::{env_lookup, lookup_nonempty, lookup_parse};
pub use logging::{daily_log_path, init_tracing, init_tracing_with_file};
