//! Ollama client implementation
//!
//! Async HTTP client for the Ollama chat API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::{Config, Message, Result, StrideError};
use crate::llm::traits::{Completion, CompletionProvider, GenerateOptions, TokenUsage};

/// Ollama API client
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
    model: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.llm.base_url(),
            model: config.model.name.clone(),
        })
    }

    /// Build the request body for the chat endpoint
    fn build_request<'a>(
        &'a self,
        messages: &'a [Message],
        options: &GenerateOptions,
    ) -> ChatRequest<'a> {
        let options = options
            .temperature
            .map(|temperature| OllamaOptions { temperature });

        ChatRequest {
            model: &self.model,
            messages,
            options,
            stream: false,
        }
    }

    /// Convert Ollama response to a Completion
    fn to_completion(response: ChatResponse) -> Completion {
        Completion {
            content: response.message.content,
            usage: TokenUsage::from_counts(response.prompt_eval_count, response.eval_count),
            model: response.model,
        }
    }
}

#[async_trait]
impl CompletionProvider for OllamaClient {
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerateOptions,
    ) -> Result<Completion> {
        let request = self.build_request(messages, options);
        debug!(body = %serde_json::to_string(&request)?, "Ollama request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    StrideError::transport(format!(
                        "Cannot connect to Ollama at {}. Is it running?",
                        self.base_url
                    ))
                } else {
                    StrideError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 && error_text.contains("not found") {
                return Err(StrideError::ModelNotFound(self.model.clone()));
            }

            return Err(StrideError::transport(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        debug!(body = %response_text, "Ollama response");

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| StrideError::transport(format!("Failed to parse response: {}", e)))?;

        Ok(Self::to_completion(chat_response))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
