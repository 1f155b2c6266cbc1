//! Ordered multi-provider fallback
//!
//! The manager holds the configured providers in a fixed order and returns the
//! first successful generation. There is no health tracking, weighting or
//! sticky selection: for a fixed provider set and preference the attempt
//! sequence is always the same.
//!
//! Every failure moves on to the next candidate, including authentication
//! errors. A bad key is not treated as a reason to stop early.

use crate::providers::build_provider;
use crate::{
    GenerationRequest, GenerationResult, LLMError, LLMProvider, ProviderAttempt, ProviderDescriptor,
    ProviderError, Result,
};
use tracing::{error, info, warn};

/// Tries providers in construction order until one succeeds
pub struct ModelFallbackManager {
    providers: Vec<Box<dyn LLMProvider>>,
}

impl std::fmt::Debug for ModelFallbackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelFallbackManager")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl ModelFallbackManager {
    /// Build one client per descriptor, in descriptor order
    ///
    /// A client that cannot be constructed is logged and skipped. Ending up
    /// with no clients at all is fatal.
    pub fn from_descriptors(descriptors: &[ProviderDescriptor]) -> Result<Self> {
        info!("Initializing AI model clients...");

        let mut providers = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            match build_provider(descriptor) {
                Ok(provider) => {
                    info!("{} client loaded (model: {})", descriptor.name, descriptor.model);
                    providers.push(provider);
                }
                Err(e) => warn!("{} client failed to load: {e}", descriptor.name),
            }
        }

        Self::with_providers(providers)
    }

    /// Use an explicit ordered list of providers
    pub fn with_providers(providers: Vec<Box<dyn LLMProvider>>) -> Result<Self> {
        if providers.is_empty() {
            return Err(LLMError::NoProvidersConfigured);
        }
        info!("Loaded {} model client(s)", providers.len());
        Ok(Self { providers })
    }

    /// Provider names in attempt order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Configured providers in attempt order
    pub fn providers(&self) -> &[Box<dyn LLMProvider>] {
        &self.providers
    }

    /// Number of configured providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Always false for a constructed manager
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Generate with the first provider that succeeds
    ///
    /// A matching `preferred` provider (case-insensitive) is tried once ahead
    /// of the normal order. Whether or not it fails, the full ordered pass
    /// that follows still includes it.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        preferred: Option<&str>,
    ) -> Result<GenerationResult> {
        info!("Calling AI models to generate the report");

        let mut attempts = Vec::new();

        if let Some(provider) = preferred.and_then(|name| self.find(name)) {
            info!("Trying preferred model: {}", provider.name());
            match provider.generate(request).await {
                Ok(content) => return Ok(success(provider, content)),
                Err(e) => {
                    log_failure(provider.name(), &e);
                    info!("Switching to fallback models...");
                    attempts.push(attempt(provider, e));
                }
            }
        } else if let Some(name) = preferred {
            warn!("Preferred model '{name}' is not configured; using default order");
        }

        for provider in &self.providers {
            info!("Trying model: {}", provider.name());
            match provider.generate(request).await {
                Ok(content) => return Ok(success(&**provider, content)),
                Err(e) => {
                    log_failure(provider.name(), &e);
                    info!("Switching to next model...");
                    attempts.push(attempt(&**provider, e));
                }
            }
        }

        error!("All {} AI model attempts failed", attempts.len());
        Err(LLMError::AllProvidersFailed(attempts))
    }

    fn find(&self, name: &str) -> Option<&dyn LLMProvider> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .map(|p| &**p)
    }
}

fn success(provider: &dyn LLMProvider, content: String) -> GenerationResult {
    info!("Report generated by {}", provider.name());
    GenerationResult {
        content,
        provider_name: provider.name().to_string(),
    }
}

fn attempt(provider: &dyn LLMProvider, error: ProviderError) -> ProviderAttempt {
    ProviderAttempt {
        provider: provider.name().to_string(),
        error,
    }
}

fn log_failure(provider: &str, err: &ProviderError) {
    match (err.status(), err.body()) {
        (Some(status), Some(body)) => {
            error!(provider, status, body, "{provider} HTTP error: {err}");
        }
        (Some(status), None) => error!(provider, status, "{provider} call failed: {err}"),
        _ => error!(provider, "{provider} call failed: {err}"),
    }
}
