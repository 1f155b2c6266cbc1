//! Structured market record
//!
//! Amounts are expressed in 100 million CNY (亿元) throughout, which is the
//! unit the report prompt quotes.

use serde::{Deserialize, Serialize};

/// Closing quote of one index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexQuote {
    pub name: String,
    pub code: String,
    pub close: f64,
    /// Percent change
    pub change_pct: f64,
    /// Point change
    pub change: f64,
    /// Turnover in 100M CNY
    pub turnover: f64,
    /// Volume in lots
    pub volume: f64,
    pub prev_close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
}

/// Advance/decline counts across all A-shares
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketBreadth {
    pub advancing: u32,
    pub declining: u32,
    pub unchanged: u32,
    /// All listed rows, including suspended ones without a change figure
    pub total: u32,
    pub limit_up: u32,
    pub limit_down: u32,
}

impl MarketBreadth {
    /// Advance/decline ratio text, e.g. `"3120/1876"`
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.advancing, self.declining)
    }
}

/// One industry board's move
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorMove {
    pub name: String,
    pub change_pct: f64,
    /// Leading stock of the board
    pub leader: String,
}

/// Best and worst industry boards of the day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorBoard {
    /// Strongest first
    pub gainers: Vec<SectorMove>,
    /// Weakest first
    pub losers: Vec<SectorMove>,
}

/// One stock in the main-force capital flow ranking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowEntry {
    pub name: String,
    pub code: String,
    /// Net main-force amount in 100M CNY (negative for outflow)
    pub net_amount: f64,
    pub change_pct: f64,
}

/// Main-force capital flow ranking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalFlow {
    /// Largest net inflow first
    pub inflow: Vec<FlowEntry>,
    /// Largest net outflow first
    pub outflow: Vec<FlowEntry>,
}

/// Stock Connect northbound net inflow in 100M CNY
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NorthboundFlow {
    pub shanghai: f64,
    pub shenzhen: f64,
    pub total: f64,
}

impl NorthboundFlow {
    /// Build from the two connect channels
    pub fn new(shanghai: f64, shenzhen: f64) -> Self {
        Self {
            shanghai,
            shenzhen,
            total: shanghai + shenzhen,
        }
    }
}

/// Everything the report prompt is built from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSnapshot {
    /// Beijing time the snapshot was taken, `YYYY-MM-DD HH:MM:SS`
    pub fetched_at: String,
    /// Data provider attribution
    pub source: String,
    pub indices: Vec<IndexQuote>,
    pub breadth: MarketBreadth,
    pub sectors: SectorBoard,
    pub capital_flow: CapitalFlow,
    pub northbound: NorthboundFlow,
}

impl MarketSnapshot {
    /// Look an index up by its display name
    pub fn index(&self, name: &str) -> Option<&IndexQuote> {
        self.indices.iter().find(|index| index.name == name)
    }

    /// Closing level of an index, 0.0 when absent
    pub fn index_close(&self, name: &str) -> f64 {
        self.index(name).map_or(0.0, |index| index.close)
    }
}
