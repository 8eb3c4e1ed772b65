// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pinecone REST client
//!
//! Only the two calls the question-answering path needs: resolving an
//! index's data-plane host and running a nearest-neighbour query.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

use super::types::VectorError;

/// A nearest-neighbour match
#[derive(Debug, Clone, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Data-plane operations against one index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
    ) -> Result<Vec<QueryMatch>, VectorError>;
}

#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    /// Control-plane base URL used to describe indexes
    pub controller_url: String,
    /// Data-plane host; skips the describe call when set
    pub index_host: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    namespace: &'a str,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

/// Handle on a single Pinecone index
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    host: String,
    timeout_ms: u64,
}

impl PineconeIndex {
    /// Connect to an existing index, resolving its host if not configured
    pub async fn connect(config: &PineconeConfig, index_name: &str) -> Result<Self, VectorError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VectorError::Http(e.to_string()))?;

        let host = match &config.index_host {
            Some(host) if !host.is_empty() => host.clone(),
            _ => Self::describe(&client, config, index_name).await?,
        };

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            host: normalize_host(&host),
            timeout_ms: config.timeout_ms,
        })
    }

    async fn describe(
        client: &Client,
        config: &PineconeConfig,
        index_name: &str,
    ) -> Result<String, VectorError> {
        let url = format!(
            "{}/indexes/{}",
            config.controller_url.trim_end_matches('/'),
            index_name
        );
        let response = client
            .get(&url)
            .header("Api-Key", &config.api_key)
            .send()
            .await
            .map_err(|e| VectorError::from_reqwest(e, config.timeout_ms))?;

        let status = response.status();
        if status == 404 {
            return Err(VectorError::IndexNotFound(index_name.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: DescribeIndexResponse = response.json().await.map_err(|e| VectorError::Api {
            status: 0,
            message: format!("JSON parse error: {}", e),
        })?;
        debug!("Resolved index {} to host {}", index_name, body.host);
        Ok(body.host)
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        namespace: &str,
        top_k: usize,
    ) -> Result<Vec<QueryMatch>, VectorError> {
        let response = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                vector,
                top_k,
                namespace,
                include_metadata: true,
            })
            .send()
            .await
            .map_err(|e| VectorError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: QueryResponse = response.json().await.map_err(|e| VectorError::Api {
            status: 0,
            message: format!("JSON parse error: {}", e),
        })?;
        Ok(body.matches)
    }
}
