//! Completion provider trait for abstracting different backends
//!
//! Enables swapping between Ollama, OpenAI-compatible endpoints, and test doubles.

use async_trait::async_trait;

use crate::core::{Message, Result};

/// Response from a completion provider
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Text content of the reply
    pub content: String,
    /// Token usage information
    pub usage: Option<TokenUsage>,
    /// Model that generated the reply
    pub model: String,
}

impl Completion {
    /// A reply carrying only text
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub(crate) fn from_counts(prompt: Option<u32>, completion: Option<u32>) -> Option<Self> {
        match (prompt, completion) {
            (Some(prompt), Some(completion)) => Some(Self {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: prompt.saturating_add(completion),
            }),
            _ => None,
        }
    }
}

/// Options for a completion request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    /// Temperature for sampling (0.0 - 2.0)
    pub temperature: Option<f32>,
}

impl GenerateOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
        }
    }
}

/// Trait for completion transports
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send role-tagged messages and return the model's raw reply
    async fn complete(&self, messages: &[Message], options: &GenerateOptions)
        -> Result<Completion>;

    /// Get the provider name
    fn name(&self) -> &str;
}
