//! LLM module - completion transport integrations
//!
//! Provides one request/response abstraction with Ollama and OpenAI backends.

pub mod ollama;
pub mod provider;
pub mod traits;

pub use ollama::OllamaClient;
pub use provider::create_provider;
pub use traits::{Completion, CompletionProvider, GenerateOptions, TokenUsage};
