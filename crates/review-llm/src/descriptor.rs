//! Provider descriptors and credential slots
//!
//! A descriptor is everything needed to build one vendor client. Descriptors
//! are enumerated once at start-up from a fixed, ordered table of credential
//! slots; a slot whose credential is missing or blank contributes nothing.

use crate::{LLMError, Result};
use review_utils::lookup_nonempty;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Per-call timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Vendor request/response shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// `POST {base}/chat/completions` with bearer auth
    ChatCompletions,
    /// `POST {base}/models/{model}:generateContent?key=...`
    GenerateContent,
}

/// A named credential slot with its vendor defaults
#[derive(Debug, Clone, Copy)]
pub struct ProviderSlot {
    /// Vendor tag, matched case-insensitively against the preference
    pub name: &'static str,
    /// Environment key holding the credential
    pub key_var: &'static str,
    /// Environment key overriding the model
    pub model_var: &'static str,
    /// Environment key overriding the endpoint
    pub base_var: &'static str,
    pub default_model: &'static str,
    pub default_base: &'static str,
    pub wire_format: WireFormat,
    /// Output token cap sent with every request
    pub max_tokens: u32,
}

/// Credential slots in fallback order
pub const PROVIDER_SLOTS: [ProviderSlot; 3] = [
    ProviderSlot {
        name: "Gemini",
        key_var: "GEMINI_API_KEY",
        model_var: "GEMINI_MODEL",
        base_var: "GEMINI_API_BASE",
        default_model: "gemini-2.5-pro",
        default_base: "https://generativelanguage.googleapis.com/v1",
        wire_format: WireFormat::GenerateContent,
        max_tokens: 8192,
    },
    ProviderSlot {
        name: "StepFun",
        key_var: "STEPFUN_API_KEY",
        model_var: "STEPFUN_MODEL",
        base_var: "STEPFUN_API_BASE",
        default_model: "step-2-16k",
        default_base: "https://api.stepfun.com/v1",
        wire_format: WireFormat::ChatCompletions,
        max_tokens: 16000,
    },
    ProviderSlot {
        name: "DeepSeek",
        key_var: "DEEPSEEK_API_KEY",
        model_var: "DEEPSEEK_MODEL",
        base_var: "DEEPSEEK_API_BASE",
        default_model: "deepseek-chat",
        default_base: "https://api.deepseek.com/v1",
        wire_format: WireFormat::ChatCompletions,
        max_tokens: 8000,
    },
];

/// Look a slot up by vendor name (case-insensitive)
pub fn find_slot(name: &str) -> Option<&'static ProviderSlot> {
    PROVIDER_SLOTS
        .iter()
        .find(|slot| slot.name.eq_ignore_ascii_case(name))
}

/// Everything needed to build one vendor client
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub name: String,
    pub credential: String,
    pub endpoint: Url,
    pub model: String,
    pub wire_format: WireFormat,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ProviderDescriptor {
    /// Build a descriptor for `slot` with its default endpoint and model
    pub fn for_slot(slot: &ProviderSlot, credential: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: slot.name.to_string(),
            credential: credential.into(),
            endpoint: parse_endpoint(slot.name, slot.default_base)?,
            model: slot.default_model.to_string(),
            wire_format: slot.wire_format,
            max_tokens: slot.max_tokens,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Override the endpoint
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = parse_endpoint(&self.name, endpoint)?;
        Ok(self)
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Endpoint without a trailing slash, ready for path concatenation
    pub fn api_base(&self) -> &str {
        self.endpoint.as_str().trim_end_matches('/')
    }

    /// Enumerate descriptors from every slot with a non-empty credential
    ///
    /// Order follows [`PROVIDER_SLOTS`]. An empty result is not an error here;
    /// the fallback manager decides whether that is fatal.
    pub fn from_lookup<F>(lookup: &F, timeout: Duration) -> Result<Vec<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut descriptors = Vec::new();

        for slot in &PROVIDER_SLOTS {
            let Some(credential) = lookup_nonempty(lookup, slot.key_var) else {
                continue;
            };

            let mut descriptor = Self::for_slot(slot, credential)?.with_timeout(timeout);
            if let Some(base) = lookup_nonempty(lookup, slot.base_var) {
                descriptor = descriptor.with_endpoint(&base)?;
            }
            if let Some(model) = lookup_nonempty(lookup, slot.model_var) {
                descriptor = descriptor.with_model(model);
            }
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("name", &self.name)
            .field("credential", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("wire_format", &self.wire_format)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_endpoint(provider: &str, endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| LLMError::InvalidDescriptor {
        provider: provider.to_string(),
        detail: format!("invalid endpoint '{endpoint}': {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(LLMError::InvalidDescriptor {
            provider: provider.to_string(),
            detail: format!("endpoint must be http(s): {endpoint}"),
        });
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn timeout() -> Duration {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    }

    #[test]
    fn test_only_filled_slots_become_descriptors() {
        let lookup = lookup_from(&[("DEEPSEEK_API_KEY", "ds-key"), ("GEMINI_API_KEY", "gm-key")]);
        let descriptors = ProviderDescriptor::from_lookup(&lookup, timeout()).unwrap();

        let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Gemini", "DeepSeek"]);
        assert_eq!(descriptors[0].wire_format, WireFormat::GenerateContent);
        assert_eq!(descriptors[1].model, "deepseek-chat");
    }

    #[test]
    fn test_blank_credential_excludes_slot() {
        let lookup = lookup_from(&[("STEPFUN_API_KEY", "   ")]);
        let descriptors = ProviderDescriptor::from_lookup(&lookup, timeout()).unwrap();
        assert!(descriptors.is_empty());
    }

    #[test]
    fn test_overrides_apply() {
        let lookup = lookup_from(&[
            ("STEPFUN_API_KEY", "sf-key"),
            ("STEPFUN_MODEL", "step-1-flash"),
            ("STEPFUN_API_BASE", "http://127.0.0.1:9000/v1/"),
        ]);
        let descriptors =
            ProviderDescriptor::from_lookup(&lookup, Duration::from_secs(30)).unwrap();

        assert_eq!(descriptors[0].model, "step-1-flash");
        assert_eq!(descriptors[0].api_base(), "http://127.0.0.1:9000/v1");
        assert_eq!(descriptors[0].timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let lookup = lookup_from(&[("GEMINI_API_KEY", "k"), ("GEMINI_API_BASE", "not a url")]);
        let result = ProviderDescriptor::from_lookup(&lookup, timeout());
        assert!(matches!(result, Err(LLMError::InvalidDescriptor { .. })));
    }

    #[test]
    fn test_debug_redacts_credential() {
        let descriptor = ProviderDescriptor::for_slot(&PROVIDER_SLOTS[1], "secret-key").unwrap();
        let debug = format!("{descriptor:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_find_slot_is_case_insensitive() {
        assert_eq!(find_slot("stepfun").map(|s| s.name), Some("StepFun"));
        assert!(find_slot("openai").is_none());
    }
}
