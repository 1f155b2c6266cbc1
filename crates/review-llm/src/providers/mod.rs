//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait for each
//! vendor wire format.

pub mod gemini;
pub mod openai;

pub use gemini::{GeminiConfig, GeminiModelInfo, GeminiProvider};
pub use openai::{OpenAIConfig, OpenAIProvider};

use crate::{LLMProvider, ProviderDescriptor, ProviderResult, WireFormat};

/// Build the adapter matching a descriptor's wire format
pub fn build_provider(descriptor: &ProviderDescriptor) -> ProviderResult<Box<dyn LLMProvider>> {
    Ok(match descriptor.wire_format {
        WireFormat::ChatCompletions => Box::new(OpenAIProvider::from_descriptor(descriptor)?),
        WireFormat::GenerateContent => Box::new(GeminiProvider::from_descriptor(descriptor)?),
    })
}
