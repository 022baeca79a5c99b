//! Completion provider implementations and factory
//!
//! Submodules implement specific remote providers.

pub mod openai;

use std::sync::Arc;

use crate::core::config::{Config, ProviderType};
use crate::core::Result;
use crate::llm::traits::CompletionProvider;
use crate::llm::OllamaClient;

use self::openai::OpenAiProvider;

/// Create a new completion provider based on configuration
///
/// Built once per run and shared by the planner and evaluator.
pub fn create_provider(config: &Config) -> Result<Arc<dyn CompletionProvider>> {
    let provider: Arc<dyn CompletionProvider> = match config.llm.provider {
        ProviderType::Ollama => Arc::new(OllamaClient::from_config(config)?),
        ProviderType::OpenAi => Arc::new(OpenAiProvider::from_config(config)?),
    };
    Ok(provider)
}
