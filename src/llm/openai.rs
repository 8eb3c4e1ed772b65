// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::types::{ChatMessage, LlmError};
use super::LanguageModel;

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "no_stop")]
    stop: &'a [String],
}

fn no_stop(stop: &&[String]) -> bool {
    stop.is_empty()
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

/// Chat model bound to one model id and temperature
pub struct OpenAiChatModel {
    client: Client,
    endpoint: String,
    api_key: String,
    model_name: String,
    temperature: f32,
    timeout_ms: u64,
}

impl OpenAiChatModel {
    pub fn new(config: &OpenAiConfig, model_name: &str, temperature: f32) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model_name: model_name.to_string(),
            temperature,
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    fn map_transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            LlmError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        stop: &[String],
    ) -> Result<String, LlmError> {
        let start = std::time::Instant::now();
        let request = ChatRequest {
            model: &self.model_name,
            messages,
            temperature: self.temperature,
            stop,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status == 429 {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        debug!(
            "Completion from {} in {}ms ({} chars)",
            self.model_name,
            start.elapsed().as_millis(),
            text.len()
        );

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
