//! OpenAI Provider
//!
//! Client for OpenAI-compatible `/v1/chat/completions` endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

use crate::core::{Config, Message, Result, StrideError};
use crate::llm::traits::{Completion, CompletionProvider, GenerateOptions, TokenUsage};

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl OpenAiProvider {
    /// Build a provider, reading the API key from the configured variable
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = env::var(&config.llm.api_key_env).map_err(|_| {
            StrideError::config(format!(
                "{} environment variable is required for the openai provider",
                config.llm.api_key_env
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.llm.base_url(),
            api_key,
            model: config.model.name.clone(),
        })
    }

    fn to_completion(response: ChatResponse) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| StrideError::transport("OpenAI response contained no choices"))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            usage: response
                .usage
                .and_then(|u| TokenUsage::from_counts(Some(u.prompt_tokens), Some(u.completion_tokens))),
            model: response.model,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerateOptions,
    ) -> Result<Completion> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
        };
        debug!(messages = messages.len(), model = %self.model, "OpenAI request");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    StrideError::transport(format!("Cannot connect to {}", self.base_url))
                } else {
                    StrideError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 && error_text.contains("model") {
                return Err(StrideError::ModelNotFound(self.model.clone()));
            }

            return Err(StrideError::transport(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        debug!(body = %response_text, "OpenAI response");

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| StrideError::transport(format!("Failed to parse response: {}", e)))?;

        Self::to_completion(chat_response)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
