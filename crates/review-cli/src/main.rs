//! A-share evening review CLI
//!
//! # Usage
//!
//! ```bash
//! # Full run: fetch, generate, save and email when RECIPIENT_EMAIL is set
//! market-review
//!
//! # Generate a report for a specific date into a custom directory
//! market-review generate --date 2025-11-03 --output-dir /tmp/reports
//!
//! # Deliver an existing report
//! market-review send reader@example.com reports/A股晚间复盘报告_2025-11-03.md
//!
//! # Inspect inputs
//! market-review fetch --json snapshot.json
//! market-review providers
//! market-review probe --provider deepseek
//! market-review models
//! ```

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use review_report::ReviewConfig;
use review_report::config::DEFAULT_LOG_DIR;
use review_utils::{init_tracing, init_tracing_with_file};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "market-review")]
#[command(about = "A-share evening review report generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Dotenv file to load before reading configuration (default: ./.env if present)
    #[arg(long, global = true, env = "MARKET_REVIEW_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Directory for the daily log file (overrides LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Generate, save and email today's report (default)
    Run,

    /// Generate and save a report without sending it
    Generate {
        /// Trading date (YYYY-MM-DD, default: today in Beijing time)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Output directory (overrides REPORT_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Email an existing report file
    Send {
        /// Recipient address
        recipient: String,

        /// Report file to send
        file: PathBuf,

        /// Subject line (default: dated report title)
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Fetch market data and print the formatted data block
    Fetch {
        /// Also write the raw snapshot as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Send a short greeting through the model fallback chain
    Probe {
        /// Vendor to try first
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// List configured model providers
    Providers,

    /// List Gemini models that support content generation
    Models,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_file = load_env(cli.env_file.as_deref())?;
    let config = ReviewConfig::from_env();
    let _log_guard = init_logging(&resolve_log_dir(cli.log_dir.clone(), config.as_ref().ok()));

    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }
    let config = config.context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run(&config).await,
        Commands::Generate { date, output_dir } => {
            commands::generate(&config, date, output_dir).await
        }
        Commands::Send {
            recipient,
            file,
            subject,
        } => commands::send(&config, &recipient, &file, subject.as_deref()).await,
        Commands::Fetch { json } => commands::fetch(&config, json.as_deref()).await,
        Commands::Probe { provider } => commands::probe(&config, provider.as_deref()).await,
        Commands::Providers => commands::providers(&config),
        Commands::Models => commands::models(&config).await,
    }
}

/// Load an explicit dotenv file, or `./.env` when one exists
fn load_env(path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenvy::dotenv().ok()),
    }
}

/// `--log-dir` first, then the configured `LOG_DIR`
fn resolve_log_dir(cli_dir: Option<PathBuf>, config: Option<&ReviewConfig>) -> PathBuf {
    cli_dir
        .or_else(|| config.map(|c| c.log_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
}

fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    match init_tracing_with_file(log_dir) {
        Ok((path, guard)) => {
            info!("Logging to {}", path.display());
            Some(guard)
        }
        Err(e) => {
            init_tracing();
            warn!("File logging disabled: {e:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["market-review"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_generate_parses_date() {
        let cli = Cli::try_parse_from([
            "market-review",
            "generate",
            "--date",
            "2025-11-03",
            "--output-dir",
            "out",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::Generate {
                date: NaiveDate::from_ymd_opt(2025, 11, 3),
                output_dir: Some(PathBuf::from("out")),
            })
        );
    }

    #[test]
    fn test_generate_rejects_bad_date() {
        let result = Cli::try_parse_from(["market-review", "generate", "--date", "03/11/2025"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_send_requires_recipient_and_file() {
        assert!(Cli::try_parse_from(["market-review", "send", "a@example.com"]).is_err());

        let cli = Cli::try_parse_from([
            "market-review",
            "--log-dir",
            "/tmp/logs",
            "send",
            "a@example.com",
            "report.md",
            "--subject",
            "Daily",
        ])
        .unwrap();

        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(
            cli.command,
            Some(Commands::Send {
                recipient: "a@example.com".to_string(),
                file: PathBuf::from("report.md"),
                subject: Some("Daily".to_string()),
            })
        );
    }

    #[test]
    fn test_log_dir_prefers_flag_then_config() {
        let config = ReviewConfig::from_lookup(&|key: &str| {
            (key == "LOG_DIR").then(|| "/var/log/review".to_string())
        })
        .unwrap();

        assert_eq!(
            resolve_log_dir(Some(PathBuf::from("cli-logs")), Some(&config)),
            PathBuf::from("cli-logs")
        );
        assert_eq!(
            resolve_log_dir(None, Some(&config)),
            PathBuf::from("/var/log/review")
        );
        assert_eq!(resolve_log_dir(None, None), PathBuf::from("logs"));
    }

    #[test]
    fn test_missing_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_env(Some(&dir.path().join("absent.env")));
        assert!(result.is_err());
    }
}
