//! A-share market data for the evening review
//!
//! This crate produces the structured market record the report is built
//! from and renders it into the report prompt. It includes:
//!
//! - `MarketSnapshot`: indices, breadth, sector boards, capital flow and
//!   northbound flow, every field defaulting to zero/empty
//! - `MarketDataSource`: the "fetch everything" seam, implemented by
//!   `EastMoneyClient` over the public EastMoney quote API
//! - `PromptBuilder`: minijinja templates for the data block, the report
//!   prompt and the analyst system instruction
//!
//! # Example
//!
//! ```rust,ignore
//! use review_market::{EastMoneyClient, MarketConfig, MarketDataSource, PromptBuilder};
//!
//! let client = EastMoneyClient::new(MarketConfig::default())?;
//! let snapshot = client.fetch_all().await;
//! let prompts = PromptBuilder::new()?;
//! println!("{}", prompts.format_market_data(&snapshot)?);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod prompts;
pub mod snapshot;
pub mod source;

// Re-export main types for convenience
pub use api::EastMoneyClient;
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use prompts::{PromptBuilder, SYSTEM_INSTRUCTION};
pub use snapshot::{
    CapitalFlow, FlowEntry, IndexQuote, MarketBreadth, MarketSnapshot, NorthboundFlow, SectorBoard,
    SectorMove,
};
pub use source::MarketDataSource;
