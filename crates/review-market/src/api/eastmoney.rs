//! EastMoney quote API client
//!
//! Field codes used by the `push2` endpoints (with `fltt=2` values arrive as
//! plain decimals, and `"-"` marks a missing figure):
//!
//! | code | meaning               |
//! |------|-----------------------|
//! | f2   | latest price          |
//! | f3   | change %              |
//! | f4   | change                |
//! | f5   | volume                |
//! | f6   | turnover (CNY)        |
//! | f12  | code                  |
//! | f14  | name                  |
//! | f15  | high                  |
//! | f16  | low                   |
//! | f17  | open                  |
//! | f18  | previous close        |
//! | f62  | main-force net (CNY)  |
//! | f128 | board leading stock   |

use crate::error::{MarketError, Result};
use crate::{
    CapitalFlow, FlowEntry, IndexQuote, MarketBreadth, MarketConfig, MarketDataSource,
    MarketSnapshot, NorthboundFlow, SectorBoard, SectorMove,
};
use async_trait::async_trait;
use reqwest::Client;
use review_utils::beijing_now;
use serde_json::Value;
use tracing::{info, warn};

/// Data provider attribution carried into the report
pub const SOURCE_NAME: &str = "EastMoney (东方财富)";

/// Indices tracked by the report: (display name, code, secid)
pub const TRACKED_INDICES: [(&str, &str, &str); 5] = [
    ("上证指数", "000001", "1.000001"),
    ("深证成指", "399001", "0.399001"),
    ("创业板指", "399006", "0.399006"),
    ("科创50", "000688", "1.000688"),
    ("北证50", "899050", "0.899050"),
];

/// Every listed A-share: SZ main board, ChiNext, SH main board, STAR, BSE
const A_SHARE_FILTER: &str = "m:0 t:6,m:0 t:80,m:1 t:2,m:1 t:23,m:0 t:81 s:2048";

/// Industry boards
const INDUSTRY_BOARD_FILTER: &str = "m:90 t:2 f:!50";

const YUAN_PER_YI: f64 = 1e8;
const WAN_PER_YI: f64 = 1e4;

/// Sort direction of a `clist` ranking
#[derive(Debug, Clone, Copy)]
enum Order {
    Descending,
    Ascending,
}

impl Order {
    fn param(self) -> &'static str {
        match self {
            Self::Descending => "1",
            Self::Ascending => "0",
        }
    }
}

/// EastMoney quote API client
#[derive(Debug, Clone)]
pub struct EastMoneyClient {
    client: Client,
    config: MarketConfig,
}

impl EastMoneyClient {
    /// Create a new client
    pub fn new(config: MarketConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent("Mozilla/5.0 (market-review)")
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Closing quotes of the tracked indices, in tracking order
    pub async fn fetch_indices(&self) -> Result<Vec<IndexQuote>> {
        info!("Fetching index data...");

        let secids = TRACKED_INDICES
            .iter()
            .map(|(_, _, secid)| *secid)
            .collect::<Vec<_>>()
            .join(",");

        let data = self
            .get_json(
                "/api/qt/ulist.np/get",
                &[
                    ("fltt", "2".to_string()),
                    ("invt", "2".to_string()),
                    ("secids", secids),
                    (
                        "fields",
                        "f2,f3,f4,f5,f6,f12,f14,f15,f16,f17,f18".to_string(),
                    ),
                ],
            )
            .await?;

        let rows = diff_rows(&data);
        let mut indices = Vec::new();

        for (name, code, _) in &TRACKED_INDICES {
            let Some(row) = rows.iter().find(|row| text(row, "f12") == *code) else {
                continue;
            };
            let quote = IndexQuote {
                name: (*name).to_string(),
                code: (*code).to_string(),
                close: number(row, "f2").unwrap_or_default(),
                change_pct: number(row, "f3").unwrap_or_default(),
                change: number(row, "f4").unwrap_or_default(),
                turnover: number(row, "f6").unwrap_or_default() / YUAN_PER_YI,
                volume: number(row, "f5").unwrap_or_default(),
                prev_close: number(row, "f18").unwrap_or_default(),
                open: number(row, "f17").unwrap_or_default(),
                high: number(row, "f15").unwrap_or_default(),
                low: number(row, "f16").unwrap_or_default(),
            };
            info!("  {}: {:.2} ({:+.2}%)", quote.name, quote.close, quote.change_pct);
            indices.push(quote);
        }

        if indices.is_empty() {
            return Err(MarketError::ApiError("no index rows returned".to_string()));
        }

        info!("Fetched {} indices", indices.len());
        Ok(indices)
    }

    /// Advance/decline and limit counts over every listed A-share
    pub async fn fetch_breadth(&self) -> Result<MarketBreadth> {
        info!("Fetching market breadth...");

        let threshold = self.config.limit_threshold;
        let mut breadth = MarketBreadth::default();
        let mut seen = 0_usize;

        for page in 1..=self.config.max_pages {
            let data = self
                .clist(A_SHARE_FILTER, "f3", Order::Descending, page, self.config.page_size, "f3,f12")
                .await?;

            let rows = diff_rows(&data);
            if rows.is_empty() {
                break;
            }

            for row in &rows {
                breadth.total += 1;
                // Suspended stocks report "-" and only count toward the total
                let Some(pct) = number(row, "f3") else {
                    continue;
                };
                if pct > 0.0 {
                    breadth.advancing += 1;
                } else if pct < 0.0 {
                    breadth.declining += 1;
                } else {
                    breadth.unchanged += 1;
                }
                if pct >= threshold {
                    breadth.limit_up += 1;
                } else if pct <= -threshold {
                    breadth.limit_down += 1;
                }
            }

            seen += rows.len();
            // Without a reported total, keep paging until an empty page
            let total = data["total"]
                .as_u64()
                .and_then(|t| usize::try_from(t).ok());
            if total.is_some_and(|total| seen >= total) {
                break;
            }
        }

        if breadth.total == 0 {
            return Err(MarketError::ApiError("empty A-share list".to_string()));
        }

        info!(
            "  Up: {} | Down: {} | Flat: {} | Limit up: {} | Limit down: {}",
            breadth.advancing,
            breadth.declining,
            breadth.unchanged,
            breadth.limit_up,
            breadth.limit_down
        );
        Ok(breadth)
    }

    /// Strongest and weakest industry boards
    pub async fn fetch_sectors(&self) -> Result<SectorBoard> {
        info!("Fetching sector data...");

        let gainers = self
            .sector_ranking(Order::Descending, self.config.top_sectors)
            .await?;
        let losers = self
            .sector_ranking(Order::Ascending, self.config.bottom_sectors)
            .await?;

        if let (Some(top), Some(bottom)) = (gainers.first(), losers.first()) {
            info!("  Leading: {} ({:+.2}%)", top.name, top.change_pct);
            info!("  Lagging: {} ({:+.2}%)", bottom.name, bottom.change_pct);
        }

        Ok(SectorBoard { gainers, losers })
    }

    /// Main-force net inflow and outflow rankings
    pub async fn fetch_capital_flow(&self) -> Result<CapitalFlow> {
        info!("Fetching capital flow data...");

        let inflow = self.flow_ranking(Order::Descending).await?;
        let outflow = self.flow_ranking(Order::Ascending).await?;

        if let (Some(top), Some(bottom)) = (inflow.first(), outflow.first()) {
            info!("  Largest inflow: {} ({:.2} 亿)", top.name, top.net_amount);
            info!("  Largest outflow: {} ({:.2} 亿)", bottom.name, bottom.net_amount);
        }

        Ok(CapitalFlow { inflow, outflow })
    }

    /// Stock Connect northbound net inflow for the day
    pub async fn fetch_northbound(&self) -> Result<NorthboundFlow> {
        info!("Fetching northbound flow...");

        let data = self
            .get_json(
                "/api/qt/kamt/get",
                &[
                    ("fields1", "f1,f2,f3,f4".to_string()),
                    ("fields2", "f51,f52,f53,f54,f56".to_string()),
                ],
            )
            .await?;

        let shanghai = number(&data["hk2sh"], "dayNetAmtIn").ok_or_else(|| {
            MarketError::ApiError("missing Shanghai connect net inflow".to_string())
        })? / WAN_PER_YI;
        let shenzhen = number(&data["hk2sz"], "dayNetAmtIn").ok_or_else(|| {
            MarketError::ApiError("missing Shenzhen connect net inflow".to_string())
        })? / WAN_PER_YI;

        let flow = NorthboundFlow::new(shanghai, shenzhen);
        info!(
            "  Shanghai: {:.2} 亿 | Shenzhen: {:.2} 亿 | Total: {:.2} 亿",
            flow.shanghai, flow.shenzhen, flow.total
        );
        Ok(flow)
    }

    async fn sector_ranking(&self, order: Order, size: usize) -> Result<Vec<SectorMove>> {
        let data = self
            .clist(INDUSTRY_BOARD_FILTER, "f3", order, 1, page_size(size), "f3,f12,f14,f128")
            .await?;

        Ok(diff_rows(&data)
            .into_iter()
            .take(size)
            .map(|row| SectorMove {
                name: text(row, "f14"),
                change_pct: number(row, "f3").unwrap_or_default(),
                leader: text(row, "f128"),
            })
            .collect())
    }

    async fn flow_ranking(&self, order: Order) -> Result<Vec<FlowEntry>> {
        let size = self.config.flow_rank_size;
        let data = self
            .clist(A_SHARE_FILTER, "f62", order, 1, page_size(size), "f3,f12,f14,f62")
            .await?;

        Ok(diff_rows(&data)
            .into_iter()
            .take(size)
            .map(|row| FlowEntry {
                name: text(row, "f14"),
                code: text(row, "f12"),
                net_amount: number(row, "f62").unwrap_or_default() / YUAN_PER_YI,
                change_pct: number(row, "f3").unwrap_or_default(),
            })
            .collect())
    }

    async fn clist(
        &self,
        filter: &str,
        sort_field: &str,
        order: Order,
        page: u32,
        size: u32,
        fields: &str,
    ) -> Result<Value> {
        self.get_json(
            "/api/qt/clist/get",
            &[
                ("pn", page.to_string()),
                ("pz", size.to_string()),
                ("po", order.param().to_string()),
                ("np", "1".to_string()),
                ("fltt", "2".to_string()),
                ("invt", "2".to_string()),
                ("fid", sort_field.to_string()),
                ("fs", filter.to_string()),
                ("fields", fields.to_string()),
            ],
        )
        .await
    }

    /// GET an endpoint and return its `data` object
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let response = self
            .client
            .get(format!("{}{path}", self.config.base_url))
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::ApiError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let mut body: Value = response.json().await?;

        if let Some(rc) = body.get("rc").and_then(Value::as_i64) {
            if rc != 0 {
                return Err(MarketError::ApiError(format!("{path} returned rc={rc}")));
            }
        }

        match body.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(MarketError::ApiError(format!("{path} returned no data"))),
        }
    }
}

#[async_trait]
impl MarketDataSource for EastMoneyClient {
    async fn fetch_all(&self) -> MarketSnapshot {
        info!("Fetching A-share market data ({SOURCE_NAME})");

        let indices = self.fetch_indices().await.unwrap_or_else(|e| {
            warn!("Failed to fetch index data: {e}");
            Vec::new()
        });
        let breadth = self.fetch_breadth().await.unwrap_or_else(|e| {
            warn!("Failed to fetch market breadth: {e}");
            MarketBreadth::default()
        });
        let sectors = self.fetch_sectors().await.unwrap_or_else(|e| {
            warn!("Failed to fetch sector data: {e}");
            SectorBoard::default()
        });
        let capital_flow = self.fetch_capital_flow().await.unwrap_or_else(|e| {
            warn!("Failed to fetch capital flow: {e}");
            CapitalFlow::default()
        });
        let northbound = self.fetch_northbound().await.unwrap_or_else(|e| {
            warn!("Failed to fetch northbound flow: {e}");
            NorthboundFlow::default()
        });

        info!("Market data fetch complete");

        MarketSnapshot {
            fetched_at: beijing_now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: SOURCE_NAME.to_string(),
            indices,
            breadth,
            sectors,
            capital_flow,
            northbound,
        }
    }
}

fn page_size(size: usize) -> u32 {
    u32::try_from(size.max(1)).unwrap_or(u32::MAX)
}

/// `data.diff` rows, whether the API sent an array or an index-keyed object
fn diff_rows(data: &Value) -> Vec<&Value> {
    match &data["diff"] {
        Value::Array(rows) => rows.iter().collect(),
        Value::Object(rows) => rows.values().collect(),
        _ => Vec::new(),
    }
}

/// Numeric field; `None` for `"-"` placeholders and absent keys
fn number(row: &Value, key: &str) -> Option<f64> {
    match &row[key] {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(row: &Value, key: &str) -> String {
    match &row[key] {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
