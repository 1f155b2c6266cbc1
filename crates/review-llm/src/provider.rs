//! LLM provider trait definition

use crate::{GenerationRequest, ProviderResult};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// One implementation per vendor wire format. Implementations make exactly
/// one network call per `generate` and never retry; retry policy belongs to
/// the [`ModelFallbackManager`](crate::ModelFallbackManager).
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate text for the given prompt and optional system instruction
    ///
    /// # Returns
    ///
    /// The generated text, or a [`ProviderError`](crate::ProviderError)
    /// carrying the HTTP status and response body when one was received
    async fn generate(&self, request: &GenerationRequest) -> ProviderResult<String>;

    /// Get the provider name (e.g., "Gemini", "StepFun")
    fn name(&self) -> &str;

    /// Model identifier sent to the vendor
    fn model(&self) -> &str;
}
