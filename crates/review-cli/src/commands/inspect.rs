//! Diagnostic subcommands

use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use review_llm::providers::GeminiProvider;
use review_llm::{GenerationRequest, ModelFallbackManager, ProviderDescriptor, WireFormat};
use review_market::{EastMoneyClient, MarketDataSource, PromptBuilder};
use review_report::ReviewConfig;
use std::path::Path;
use tracing::info;

const PROBE_PROMPT: &str = "Hello, please reply with a short greeting.";

/// Print the formatted market data block, optionally dumping the snapshot
pub async fn fetch(config: &ReviewConfig, json: Option<&Path>) -> anyhow::Result<()> {
    let client = EastMoneyClient::new(config.market.clone())?;
    let snapshot = client.fetch_all().await;

    if let Some(path) = json {
        let body = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, body)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Snapshot written to {}", path.display());
    }

    println!("{}", PromptBuilder::new()?.format_market_data(&snapshot)?);
    Ok(())
}

/// Round-trip a greeting through the fallback chain
pub async fn probe(config: &ReviewConfig, provider: Option<&str>) -> anyhow::Result<()> {
    let models = ModelFallbackManager::from_descriptors(&config.providers)?;
    let preferred = provider.or(config.preferred_model.as_deref());

    let result = models
        .generate(&GenerationRequest::new(PROBE_PROMPT), preferred)
        .await?;

    println!("[{}] {}", result.provider_name, result.content.trim());
    Ok(())
}

/// Table of configured providers in attempt order
pub fn providers(config: &ReviewConfig) -> anyhow::Result<()> {

    if config.providers.is_empty() {
        println!("No model API keys configured (GEMINI_API_KEY, STEPFUN_API_KEY, DEEPSEEK_API_KEY)");
        return Ok(());
    }

    println!(
        "{}",
        providers_table(&config.providers, config.preferred_model.as_deref())
    );
    Ok(())
}

/// Gemini models usable for `generateContent`
pub async fn models(config: &ReviewConfig) -> anyhow::Result<()> {
    let descriptor = config
        .providers
        .iter()
        .find(|d| d.wire_format == WireFormat::GenerateContent)
        .context("GEMINI_API_KEY is not configured")?;

    let provider = GeminiProvider::from_descriptor(descriptor)?;
    let models = provider.list_models().await?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Model", "Display name"]);

    let mut count = 0;
    for model in models.iter().filter(|m| m.supports_generate_content()) {
        table.add_row(vec![
            model.name.trim_start_matches("models/").to_string(),
            model.display_name.clone().unwrap_or_default(),
        ]);
        count += 1;
    }

    println!("{table}");
    println!("{count} model(s) support generateContent");
    Ok(())
}

fn providers_table(providers: &[ProviderDescriptor], preferred: Option<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Provider", "Model", "Endpoint", "Timeout"]);

    for (i, descriptor) in providers.iter().enumerate() {
        let is_preferred = preferred.is_some_and(|p| p.eq_ignore_ascii_case(&descriptor.name));
        let name = if is_preferred {
            format!("{} (preferred)", descriptor.name)
        } else {
            descriptor.name.clone()
        };

        table.add_row(vec![
            (i + 1).to_string(),
            name,
            descriptor.model.clone(),
            descriptor.api_base().to_string(),
            format!("{}s", descriptor.timeout.as_secs()),
        ]);
    }

    table
}
