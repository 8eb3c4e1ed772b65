// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query embeddings via an OpenAI-compatible `/v1/embeddings` endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::VectorError;
use crate::llm::OpenAiConfig;

/// Maps text to a fixed-dimension vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, VectorError>;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct OpenAiEmbeddings {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout_ms: u64,
}

impl OpenAiEmbeddings {
    pub fn new(config: &OpenAiConfig, model: &str) -> Result<Self, VectorError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VectorError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/embeddings", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: model.to_string(),
            timeout_ms: config.timeout_ms,
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbeddings {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|e| VectorError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorError::Embedding(format!("{}: {}", status.as_u16(), message)));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| VectorError::Embedding(format!("JSON parse error: {}", e)))?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| VectorError::Embedding("no embedding returned".to_string()))
    }
}
