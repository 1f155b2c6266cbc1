//! Google Gemini provider implementation
//!
//! Gemini's `generateContent` endpoint takes the credential as a query
//! parameter and has no separate system role, so the system instruction is
//! prepended to the prompt text.
//! See: https://ai.google.dev/api/generate-content

use crate::descriptor::DEFAULT_TIMEOUT_SECS;
use crate::{GenerationRequest, LLMProvider, ProviderDescriptor, ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Vendor tag reported as the provider name
    pub name: String,
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl GeminiConfig {
    /// Create a config with default endpoint, model and sampling settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            name: "Gemini".to_string(),
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: 0.3,
            max_output_tokens: 8192,
            top_p: 0.95,
            top_k: 40,
        }
    }

    /// Build a config from a provider descriptor
    pub fn from_descriptor(descriptor: &ProviderDescriptor) -> Self {
        let mut config = Self::new(&descriptor.credential)
            .with_api_base(descriptor.api_base())
            .with_model(&descriptor.model)
            .with_timeout(descriptor.timeout.as_secs());
        config.name.clone_from(&descriptor.name);
        config.max_output_tokens = descriptor.max_tokens;
        config
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
}

/// Gemini model metadata returned by the models listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl GeminiModelInfo {
    /// Whether the model can serve `generateContent`
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a provider from a descriptor
    pub fn from_descriptor(descriptor: &ProviderDescriptor) -> ProviderResult<Self> {
        Self::with_config(GeminiConfig::from_descriptor(descriptor))
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// List the models visible to this API key
    pub async fn list_models(&self) -> ProviderResult<Vec<GeminiModelInfo>> {
        let response = self
            .client
            .get(format!("{}/models", self.config.api_base))
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let listing: ModelListing = response.json().await.map_err(|e| {
            ProviderError::UnexpectedResponse(format!("Failed to parse model listing: {e}"))
        })?;
        Ok(listing.models)
    }

    fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.combined_text(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
            },
        }
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(provider = %self.config.name, model = %self.config.model))]
    async fn generate(&self, request: &GenerationRequest) -> ProviderResult<String> {
        info!("Using Gemini model: {}", self.config.model);
        debug!("Sending request to {}", self.config.api_base);

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.api_base, self.config.model
            ))
            .query(&[("key", self.config.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&self.build_request(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let gemini_response: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let content = extract_text(gemini_response)?;
        info!("Gemini generation succeeded ({} chars)", content.chars().count());
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
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ModelListing {
    #[serde(default)]
    models: Vec<GeminiModelInfo>,
}

/// Pull `candidates[0].content.parts[0].text`
fn extract_text(response: GenerateContentResponse) -> ProviderResult<String> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        ProviderError::UnexpectedResponse("No candidates in Gemini response".to_string())
    })?;

    candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| {
            ProviderError::UnexpectedResponse("First candidate has no content parts".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider_for(server: &mockito::ServerGuard) -> GeminiProvider {
        let config = GeminiConfig::new("gm-key")
            .with_api_base(format!("{}/v1", server.url()))
            .with_timeout(5);
        GeminiProvider::with_config(config).unwrap()
    }

    #[test]
    fn test_request_concatenates_system_and_prompt() {
        let provider = GeminiProvider::with_config(GeminiConfig::new("k")).unwrap();
        let request = GenerationRequest::new("data").with_system_instruction("analyst");
        let body = serde_json::to_value(provider.build_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "analyst\n\ndata");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(body["generationConfig"]["topK"], 40);
    }

    #[tokio::test]
    async fn test_generate_uses_query_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/models/gemini-2.5-pro:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "gm-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"parts": [{"text": "prompt"}]}]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{"content": {"parts": [{"text": "gemini report"}], "role": "model"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = provider_for(&server);
        let content = provider
            .generate(&GenerationRequest::new("prompt"))
            .await
            .unwrap();

        assert_eq!(content, "gemini report");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/models/gemini-2.5-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("RESOURCE_EXHAUSTED")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&GenerationRequest::new("prompt"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(429));
        assert_eq!(err.body(), Some("RESOURCE_EXHAUSTED"));
    }

    #[tokio::test]
    async fn test_missing_candidates_is_unexpected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/models/gemini-2.5-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
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
    async fn test_list_models_filters_by_method() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .match_query(Matcher::UrlEncoded("key".into(), "gm-key".into()))
            .with_status(200)
            .with_body(
                json!({
                    "models": [
                        {"name": "models/gemini-2.5-pro", "displayName": "Gemini 2.5 Pro",
                         "supportedGenerationMethods": ["generateContent", "countTokens"]},
                        {"name": "models/embedding-001",
                         "supportedGenerationMethods": ["embedContent"]}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = provider_for(&server);
        let models = provider.list_models().await.unwrap();

        assert_eq!(models.len(), 2);
        assert!(models[0].supports_generate_content());
        assert!(!models[1].supports_generate_content());
        assert_eq!(models[0].display_name.as_deref(), Some("Gemini 2.5 Pro"));
    }
}
