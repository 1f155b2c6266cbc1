//! Report prompt templates
//!
//! Templates are organized into:
//! - `system`: the analyst system instruction
//! - `user`: the market data block and the report prompt that embeds it
//!
//! Rendering is deterministic: the same snapshot, date and generation time
//! always produce the same text.

mod system;
mod user;

pub use system::SYSTEM_INSTRUCTION;
pub use user::{MARKET_DATA, REPORT_PROMPT};

use crate::{MarketSnapshot, Result};
use chrono::NaiveDate;
use minijinja::{Environment, context};

/// Renders market snapshots into prompt text
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl std::fmt::Debug for PromptBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptBuilder")
            .field("templates", &[MARKET_DATA, REPORT_PROMPT])
            .finish()
    }
}

impl PromptBuilder {
    /// Compile the built-in templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_filter("fixed2", |value: f64| format!("{value:.2}"));
        env.add_filter("signed2", |value: f64| format!("{value:+.2}"));

        env.add_template(MARKET_DATA, user::MARKET_DATA_TEMPLATE)?;
        env.add_template(REPORT_PROMPT, user::REPORT_PROMPT_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render the Markdown data block for a snapshot
    pub fn format_market_data(&self, snapshot: &MarketSnapshot) -> Result<String> {
        let template = self.env.get_template(MARKET_DATA)?;
        Ok(template.render(snapshot)?)
    }

    /// Render the full report prompt for `date`
    ///
    /// `generated_at` is stamped into the data source footer the model is
    /// asked to reproduce.
    pub fn build_report_prompt(
        &self,
        date: NaiveDate,
        snapshot: &MarketSnapshot,
        generated_at: &str,
    ) -> Result<String> {
        let market_data = self.format_market_data(snapshot)?;
        let template = self.env.get_template(REPORT_PROMPT)?;

        Ok(template.render(context! {
            date => date.format("%Y-%m-%d").to_string(),
            market_data => market_data.trim_end(),
            shanghai_close => snapshot.index_close("上证指数"),
            chinext_close => snapshot.index_close("创业板指"),
            fetched_at => snapshot.fetched_at,
            source => snapshot.source,
            generated_at => generated_at,
            version => env!("CARGO_PKG_VERSION"),
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlowEntry, IndexQuote, MarketBreadth, NorthboundFlow, SectorMove};

    fn sample_snapshot() -> MarketSnapshot {
        MarketSnapshot {
            fetched_at: "2025-11-03 16:05:00".to_string(),
            source: "EastMoney (东方财富)".to_string(),
            indices: vec![
                IndexQuote {
                    name: "上证指数".to_string(),
                    code: "000001".to_string(),
                    close: 3976.517,
                    change_pct: 0.55,
                    change: 21.72,
                    turnover: 8123.456,
                    high: 3980.0,
                    low: 3950.25,
                    ..IndexQuote::default()
                },
                IndexQuote {
                    name: "创业板指".to_string(),
                    code: "399006".to_string(),
                    close: 3196.86,
                    change_pct: -1.2,
                    change: -38.8,
                    ..IndexQuote::default()
                },
            ],
            breadth: MarketBreadth {
                advancing: 3120,
                declining: 1876,
                unchanged: 150,
                total: 5146,
                limit_up: 65,
                limit_down: 8,
            },
            sectors: crate::SectorBoard {
                gainers: (1..=7_i32)
                    .map(|i| SectorMove {
                        name: format!("板块{i}"),
                        change_pct: f64::from(8 - i),
                        leader: format!("龙头{i}"),
                    })
                    .collect(),
                losers: vec![SectorMove {
                    name: "煤炭行业".to_string(),
                    change_pct: -2.5,
                    leader: String::new(),
                }],
            },
            capital_flow: crate::CapitalFlow {
                inflow: vec![FlowEntry {
                    name: "贵州茅台".to_string(),
                    code: "600519".to_string(),
                    net_amount: 12.346,
                    change_pct: 2.0,
                }],
                outflow: vec![FlowEntry {
                    name: "宁德时代".to_string(),
                    code: "300750".to_string(),
                    net_amount: -8.5,
                    change_pct: -3.1,
                }],
            },
            northbound: NorthboundFlow::new(12.5, -4.25),
        }
    }

    #[test]
    fn test_market_data_formats_values() {
        let prompts = PromptBuilder::new().unwrap();
        let block = prompts.format_market_data(&sample_snapshot()).unwrap();

        assert!(block.starts_with("## 真实市场数据（来自 EastMoney (东方财富)）"));
        assert!(block.contains("**上证指数**："));
        assert!(block.contains("- 收盘点位：3976.52"));
        assert!(block.contains("- 涨跌幅：+0.55%"));
        assert!(block.contains("- 涨跌幅：-1.20%"));
        assert!(block.contains("- 成交额：8123.46亿元"));
        assert!(block.contains("- 涨跌比：3120/1876"));
        assert!(block.contains("1. 贵州茅台：12.35亿元 (+2.00%)"));
        assert!(block.contains("1. 宁德时代：-8.50亿元 (-3.10%)"));
        assert!(block.contains("- **合计**：8.25亿元"));
    }

    #[test]
    fn test_market_data_keeps_top_five_sectors() {
        let prompts = PromptBuilder::new().unwrap();
        let block = prompts.format_market_data(&sample_snapshot()).unwrap();

        assert!(block.contains("5. 板块5：+3.00% (领涨股：龙头5)"));
        assert!(!block.contains("板块6"));
        assert!(block.contains("1. 煤炭行业：-2.50%"));
    }

    #[test]
    fn test_empty_snapshot_renders() {
        let prompts = PromptBuilder::new().unwrap();
        let block = prompts
            .format_market_data(&MarketSnapshot::default())
            .unwrap();

        assert!(block.contains("暂无指数数据"));
        assert!(block.contains("- 上涨家数：0"));
        assert!(block.contains("- 沪股通：0.00亿元"));
        assert!(!block.contains("领涨板块TOP5"));
        assert!(!block.contains("主力净流入TOP5"));
    }

    #[test]
    fn test_report_prompt_embeds_data_and_closes() {
        let prompts = PromptBuilder::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let snapshot = sample_snapshot();

        let prompt = prompts
            .build_report_prompt(date, &snapshot, "2025-11-03 18:00:00")
            .unwrap();

        assert!(prompt.starts_with(
            "Please generate an A-Share evening review report for [2025-11-03]"
        ));
        assert!(prompt.contains(prompts.format_market_data(&snapshot).unwrap().trim_end()));
        assert!(prompt.contains("based on real price (3976.52)"));
        assert!(prompt.contains("based on real price (3196.86)"));
        assert!(prompt.contains("#### 8. Summary and Outlook"));
        assert!(prompt.contains("- **Data Time**: 2025-11-03 16:05:00"));
        assert!(prompt.contains("**Report Generated**: 2025-11-03 18:00:00"));
    }

    #[test]
    fn test_missing_indices_close_at_zero() {
        let prompts = PromptBuilder::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

        let prompt = prompts
            .build_report_prompt(date, &MarketSnapshot::default(), "now")
            .unwrap();

        assert!(prompt.contains("based on real price (0.00)"));
        assert!(prompt.contains("- **Data Source**: unknown"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let prompts = PromptBuilder::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let snapshot = sample_snapshot();

        let first = prompts.build_report_prompt(date, &snapshot, "t").unwrap();
        let second = prompts.build_report_prompt(date, &snapshot, "t").unwrap();
        assert_eq!(first, second);
    }
}
