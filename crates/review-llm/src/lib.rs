//! LLM provider layer for market-review
//!
//! This crate turns a report prompt into narrative text using whichever
//! configured LLM vendor answers first. It includes:
//!
//! - Generation request/result types
//! - The `LLMProvider` trait every vendor adapter implements
//! - Vendor adapters for chat-completions (StepFun, DeepSeek) and
//!   generateContent (Gemini) wire formats
//! - Provider descriptors built from credential slots
//! - The `ModelFallbackManager` that tries providers in a fixed order

pub mod descriptor;
pub mod error;
pub mod fallback;
pub mod provider;
pub mod providers;
pub mod request;

// Re-export main types
pub use descriptor::{PROVIDER_SLOTS, ProviderDescriptor, ProviderSlot, WireFormat, find_slot};
pub use error::{LLMError, ProviderAttempt, ProviderError, ProviderResult, Result};
pub use fallback::ModelFallbackManager;
pub use provider::LLMProvider;
pub use request::{GenerationRequest, GenerationResult};
