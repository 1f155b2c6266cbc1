//! Report generation
//!
//! One run is strictly sequential: resolve the date, take a market snapshot,
//! render the prompt, then walk the model fallback chain. When every model
//! fails the prompt itself is wrapped into a fallback document, so a run that
//! gets this far always yields a report.

use crate::{ReviewConfig, Result};
use chrono::NaiveDate;
use review_llm::{GenerationRequest, LLMError, ModelFallbackManager};
use review_market::{EastMoneyClient, MarketDataSource, PromptBuilder, SYSTEM_INSTRUCTION};
use review_utils::{beijing_now, beijing_today};
use tracing::{info, warn};

/// A generated report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Trading date the report covers
    pub date: NaiveDate,
    /// Markdown body
    pub content: String,
    /// Model that wrote the body; `None` for the fallback document
    pub provider_name: Option<String>,
    /// Prompt the body was generated from
    pub prompt: String,
}

impl Report {
    /// Whether the fallback document was substituted
    pub fn is_fallback(&self) -> bool {
        self.provider_name.is_none()
    }
}

/// Wrap the prompt in a notice explaining that no model answered
pub fn fallback_document(prompt: &str) -> String {
    format!(
        "# A-Share Evening Review Report\n\n\
         ## Notice\n\n\
         AI service is temporarily unavailable. Below is the basic data report.\n\n\
         {prompt}\n\n\
         ---\n\n\
         **Note**: Please check the API key configuration (GEMINI_API_KEY, STEPFUN_API_KEY, \
         DEEPSEEK_API_KEY) or try again later.\n"
    )
}

/// Orchestrates one evening review
pub struct ReportGenerator {
    source: Box<dyn MarketDataSource>,
    models: ModelFallbackManager,
    prompts: PromptBuilder,
    preferred_model: Option<String>,
}

impl std::fmt::Debug for ReportGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportGenerator")
            .field("models", &self.models)
            .field("preferred_model", &self.preferred_model)
            .finish_non_exhaustive()
    }
}

impl ReportGenerator {
    /// Create a generator over an explicit source and model chain
    pub fn new(source: Box<dyn MarketDataSource>, models: ModelFallbackManager) -> Result<Self> {
        Ok(Self {
            source,
            models,
            prompts: PromptBuilder::new()?,
            preferred_model: None,
        })
    }

    /// Build the EastMoney source and the model chain from configuration
    ///
    /// Fails with `NoProvidersConfigured` when no credential slot is filled.
    pub fn from_config(config: &ReviewConfig) -> Result<Self> {
        let models = ModelFallbackManager::from_descriptors(&config.providers)?;
        let source = EastMoneyClient::new(config.market.clone())?;

        Ok(Self::new(Box::new(source), models)?
            .with_preferred_model(config.preferred_model.clone()))
    }

    /// Set the vendor tried ahead of the normal order
    pub fn with_preferred_model(mut self, preferred: Option<String>) -> Self {
        self.preferred_model = preferred;
        self
    }

    /// The model chain
    pub fn models(&self) -> &ModelFallbackManager {
        &self.models
    }

    /// Generate the report for `date`, defaulting to today in Beijing time
    pub async fn generate_report(&self, date: Option<NaiveDate>) -> Result<Report> {
        let date = date.unwrap_or_else(beijing_today);
        info!("Generating A-share evening review for {date}");

        let snapshot = self.source.fetch_all().await;
        if snapshot.indices.is_empty() {
            warn!("No index data fetched; the report will be built from partial data");
        }

        let generated_at = beijing_now().format("%Y-%m-%d %H:%M:%S").to_string();
        let prompt = self
            .prompts
            .build_report_prompt(date, &snapshot, &generated_at)?;
        let request =
            GenerationRequest::new(prompt.as_str()).with_system_instruction(SYSTEM_INSTRUCTION);

        match self
            .models
            .generate(&request, self.preferred_model.as_deref())
            .await
        {
            Ok(result) => Ok(Report {
                date,
                content: result.content,
                provider_name: Some(result.provider_name),
                prompt,
            }),
            Err(LLMError::AllProvidersFailed(attempts)) => {
                warn!(
                    "All {} model attempts failed; using the fallback document",
                    attempts.len()
                );
                Ok(Report {
                    date,
                    content: fallback_document(&prompt),
                    provider_name: None,
                    prompt,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
