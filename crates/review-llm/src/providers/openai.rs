//! OpenAI-compatible chat-completions provider
//!
//! StepFun and DeepSeek both speak the OpenAI chat-completions dialect, so a
//! single adapter serves them with a different base URL and model.
//! See: https://platform.openai.com/docs/api-reference/chat
//!
//! # Example
//!
//! ```no_run
//! use review_llm::providers::{OpenAIConfig, OpenAIProvider};
//! use review_llm::{GenerationRequest, LLMProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenAIConfig::new("DeepSeek", "sk-...")
//!         .with_api_base("https://api.deepseek.com/v1")
//!         .with_model("deepseek-chat");
//!     let provider = OpenAIProvider::with_config(config)?;
//!
//!     let request = GenerationRequest::new("Hello!")
//!         .with_system_instruction("You are a helpful assistant.");
//!     println!("{}", provider.generate(&request).await?);
//!     Ok(())
//! }
//! ```

use crate::descriptor::{DEFAULT_TIMEOUT_SECS, PROVIDER_SLOTS, ProviderSlot};
use crate::{GenerationRequest, LLMProvider, ProviderDescriptor, ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Slot whose endpoint and model seed [`OpenAIConfig::new`]
const DEFAULT_SLOT: &ProviderSlot = &PROVIDER_SLOTS[1];

/// Configuration for a chat-completions provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Vendor tag reported as the provider name
    pub name: String,

    /// API key sent as a bearer token
    pub api_key: String,

    /// Base URL, without the `/chat/completions` suffix
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Output token cap
    pub max_tokens: u32,
}

impl OpenAIConfig {
    /// Create a new config with the given vendor name and API key
    ///
    /// Endpoint, model and token cap default to the StepFun slot.
    pub fn new(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: api_key.into(),
            api_base: DEFAULT_SLOT.default_base.to_string(),
            model: DEFAULT_SLOT.default_model.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_SLOT.max_tokens,
        }
    }

    /// Build a config from a provider descriptor
    pub fn from_descriptor(descriptor: &ProviderDescriptor) -> Self {
        Self::new(&descriptor.name, &descriptor.credential)
            .with_api_base(descriptor.api_base())
            .with_model(&descriptor.model)
            .with_timeout(descriptor.timeout.as_secs())
            .with_max_tokens(descriptor.max_tokens)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the output token cap
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Chat-completions provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a new provider with custom configuration
    pub fn with_config(config: OpenAIConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a provider from a descriptor
    pub fn from_descriptor(descriptor: &ProviderDescriptor) -> ProviderResult<Self> {
        Self::with_config(OpenAIConfig::from_descriptor(descriptor))
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: build_messages(request),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(provider = %self.config.name, model = %self.config.model))]
    async fn generate(&self, request: &GenerationRequest) -> ProviderResult<String> {
        info!("Using {} model: {}", self.config.name, self.config.model);
        debug!("Sending request to {}", self.config.api_base);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(request))
            .send()
            .await?;

        // Handle errors
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let content = extract_content(chat_response)?;
        info!(
            "{} generation succeeded ({} chars)",
            self.config.name,
            content.chars().count()
        );
        Ok(content)
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// System prompt goes first in the messages array, then the user prompt
fn build_messages(request: &GenerationRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);

    if let Some(system) = &request.system_instruction {
        messages.push(ChatMessage {
            role: "system",
            content: system.clone(),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: request.prompt.clone(),
    });

    messages
}

/// Pull `choices[0].message.content`
fn extract_content(response: ChatResponse) -> ProviderResult<String> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        ProviderError::UnexpectedResponse("No choices in response".to_string())
    })?;

    choice.message.content.ok_or_else(|| {
        ProviderError::UnexpectedResponse("First choice has no message content".to_string())
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider_for(server: &mockito::ServerGuard) -> OpenAIProvider {
        let config = OpenAIConfig::new("StepFun", "test-key")
            .with_api_base(format!("{}/v1", server.url()))
            .with_timeout(5);
        OpenAIProvider::with_config(config).unwrap()
    }

    #[test]
    fn test_new_defaults_to_stepfun_slot() {
        let config = OpenAIConfig::new("StepFun", "sf-key");

        assert_eq!(config.api_base, "https://api.stepfun.com/v1");
        assert_eq!(config.model, "step-2-16k");
        assert_eq!(config.max_tokens, 16000);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_from_descriptor() {
        let descriptor =
            ProviderDescriptor::for_slot(&crate::PROVIDER_SLOTS[2], "ds-key").unwrap();
        let config = OpenAIConfig::from_descriptor(&descriptor);

        assert_eq!(config.name, "DeepSeek");
        assert_eq!(config.api_base, "https://api.deepseek.com/v1");
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.max_tokens, 8000);
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_system_message_first() {
        let request = GenerationRequest::new("prompt").with_system_instruction("system");
        let messages = build_messages(&request);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_no_system_message_when_absent() {
        let messages = build_messages(&GenerationRequest::new("prompt"));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[tokio::test]
    async fn test_generate_sends_chat_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "step-2-16k",
                "temperature": 0.3,
                "max_tokens": 16000,
                "messages": [
                    {"role": "system", "content": "be precise"},
                    {"role": "user", "content": "market data"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"choices": [{"message": {"role": "assistant", "content": "report text"}}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let provider = provider_for(&server);
        let request = GenerationRequest::new("market data").with_system_instruction("be precise");
        let content = provider.generate(&request).await.unwrap();

        assert_eq!(content, "report text");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_keeps_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":"invalid api key"}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&GenerationRequest::new("prompt"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body(), Some(r#"{"error":"invalid api key"}"#));
    }

    #[tokio::test]
    async fn test_empty_choices_is_unexpected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&GenerationRequest::new("prompt"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_unexpected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&GenerationRequest::new("prompt"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::UnexpectedResponse(_)));
    }
}
