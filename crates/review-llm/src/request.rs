//! Generation request and result types

use serde::{Deserialize, Serialize};

/// A single report-generation request
///
/// Built once per report and borrowed by every provider attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// User prompt
    pub prompt: String,

    /// Optional system instruction steering model behavior
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

impl GenerationRequest {
    /// Create a request without a system instruction
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
        }
    }

    /// Set the system instruction; blank instructions are dropped
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        let instruction = instruction.into();
        self.system_instruction = if instruction.trim().is_empty() {
            None
        } else {
            Some(instruction)
        };
        self
    }

    /// System instruction and prompt joined into a single text block
    ///
    /// Used by vendors without a separate system role.
    pub fn combined_text(&self) -> String {
        match &self.system_instruction {
            Some(system) => format!("{system}\n\n{}", self.prompt),
            None => self.prompt.clone(),
        }
    }
}

/// Successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated text, treated as opaque
    pub content: String,

    /// Name of the provider that produced it
    pub provider_name: String,
}
