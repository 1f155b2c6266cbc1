//! Subcommand implementations

mod inspect;

pub use inspect::{fetch, models, probe, providers};

use anyhow::Context;
use chrono::NaiveDate;
use review_report::{EmailSender, ReportGenerator, ReviewConfig, save_report};
use review_utils::beijing_now;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const RULE: &str = "============================================================";

/// Full pipeline: generate, save, then email when a recipient is configured
///
/// Email problems are logged; the run still succeeds once the report is
/// saved.
pub async fn run(config: &ReviewConfig) -> anyhow::Result<()> {
    info!("{RULE}");
    info!("A-share evening review");
    info!("{RULE}");
    info!("Run time: {}", beijing_now().format("%Y-%m-%d %H:%M:%S"));

    info!("Step 1/2: generating report");
    let path = generate_and_save(config, None, &config.output_dir).await?;

    info!("Step 2/2: sending email");
    match &config.recipient {
        None => {
            warn!("RECIPIENT_EMAIL is not set; skipping email delivery");
        }
        Some(recipient) => {
            let delivered = match EmailSender::new(config.mail.clone()) {
                Ok(sender) => sender.send_report(recipient, &path, None).await,
                Err(e) => Err(e),
            };
            if let Err(e) = delivered {
                error!("Email delivery failed: {e}");
                warn!("The report was generated but not sent");
            }
        }
    }

    info!("{RULE}");
    info!("Done. Report file: {}", path.display());
    info!("{RULE}");
    Ok(())
}

/// Generate and save without delivery
pub async fn generate(
    config: &ReviewConfig,
    date: Option<NaiveDate>,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dir = output_dir.unwrap_or_else(|| config.output_dir.clone());

    let path = generate_and_save(config, date, &dir).await?;
    println!("{}", path.display());
    Ok(())
}

/// Deliver an existing report file
pub async fn send(
    config: &ReviewConfig,
    recipient: &str,
    file: &Path,
    subject: Option<&str>,
) -> anyhow::Result<()> {
    if !file.is_file() {
        anyhow::bail!("report file not found: {}", file.display());
    }

    let sender = EmailSender::new(config.mail.clone()).context("email is not configured")?;
    sender
        .send_report(recipient, file, subject)
        .await
        .with_context(|| format!("failed to send {} to {recipient}", file.display()))?;

    println!("Sent {} to {recipient}", file.display());
    Ok(())
}

async fn generate_and_save(
    config: &ReviewConfig,
    date: Option<NaiveDate>,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    let generator = ReportGenerator::from_config(config)?;
    let report = generator.generate_report(date).await?;

    match &report.provider_name {
        Some(provider) => info!("Report written by {provider}"),
        None => warn!("No model produced the report; saved the fallback document"),
    }

    Ok(save_report(&report, dir)?)
}
