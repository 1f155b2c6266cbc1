//! Evening review report pipeline
//!
//! Ties the market data source, prompt rendering and the model fallback
//! manager together:
//!
//! - `ReviewConfig`: run configuration read from the environment
//! - `ReportGenerator`: snapshot → prompt → model, with a fallback document
//!   when every model fails
//! - `save_report`: writes `A股晚间复盘报告_{date}.md`
//! - `EmailSender`: SMTP delivery with an HTML rendering and the file attached
//!
//! # Example
//!
//! ```rust,ignore
//! use review_report::{ReportGenerator, ReviewConfig, save_report};
//!
//! let config = ReviewConfig::from_env()?;
//! let generator = ReportGenerator::from_config(&config)?;
//! let report = generator.generate_report(None).await?;
//! let path = save_report(&report, &config.output_dir)?;
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod mail;
pub mod storage;

pub use config::{MailConfig, ReviewConfig};
pub use error::{MailError, ReportError, Result};
pub use generator::{Report, ReportGenerator, fallback_document};
pub use mail::{EmailSender, default_subject, markdown_to_html};
pub use storage::{REPORT_FILE_PREFIX, report_file_name, save_report};
