// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SerpAPI (Google engine) search provider
//!
//! Answer boxes and knowledge-graph descriptions are returned ahead of the
//! organic results, since they usually hold the direct answer.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchLocale, SearchResult};

pub const SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// SerpAPI provider
pub struct SerpApiProvider {
    api_key: String,
    base_url: String,
    client: Client,
    timeout_ms: u64,
}

impl SerpApiProvider {
    /// Create a new SerpAPI provider
    ///
    /// # Arguments
    /// * `api_key` - SerpAPI key
    /// * `base_url` - API base, normally [`SERPAPI_BASE_URL`]
    /// * `timeout_ms` - Per-request timeout
    pub fn new(api_key: String, base_url: &str, timeout_ms: u64) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| SearchError::ApiError {
                status: 0,
                message: e.to_string(),
            })?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_ms,
        })
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    async fn search(
        &self,
        query: &str,
        locale: &SearchLocale,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if !self.is_available() {
            return Err(SearchError::NoApiKey {
                provider: "serpapi".to_string(),
            });
        }

        let num = num_results.clamp(1, 100).to_string();
        let response = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("location", locale.location.as_str()),
                ("hl", locale.hl.as_str()),
                ("gl", locale.gl.as_str()),
                ("num", num.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    SearchError::ApiError {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(SearchError::RateLimited {
                retry_after_secs: 60,
            });
        }

        // A rejected key is reported with SerpAPI's own wording
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let data: SerpApiResponse = response.json().await.map_err(|e| SearchError::ApiError {
            status: 0,
            message: format!("JSON parse error: {}", e),
        })?;

        if let Some(error) = data.error {
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: error,
            });
        }

        Ok(data.into_results(num_results))
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// The `error` field of a SerpAPI error body, or the raw body otherwise
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    knowledge_graph: Option<KnowledgeGraph>,
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    title: Option<String>,
    answer: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KnowledgeGraph {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl SerpApiResponse {
    fn into_results(self, limit: usize) -> Vec<SearchResult> {
        let mut results = Vec::new();

        if let Some(answer_box) = self.answer_box {
            if let Some(text) = answer_box.answer.or(answer_box.snippet) {
                results.push(SearchResult {
                    title: answer_box.title.unwrap_or_else(|| "Answer".to_string()),
                    url: answer_box.link.unwrap_or_default(),
                    snippet: text,
                    published_date: None,
                    source: "serpapi".to_string(),
                });
            }
        }

        if let Some(graph) = self.knowledge_graph {
            if let Some(description) = graph.description {
                results.push(SearchResult {
                    title: graph.title.unwrap_or_else(|| "Knowledge graph".to_string()),
                    url: String::new(),
                    snippet: description,
                    published_date: None,
                    source: "serpapi".to_string(),
                });
            }
        }

        results.extend(self.organic_results.into_iter().map(|r| SearchResult {
            title: r.title,
            url: r.link,
            snippet: r.snippet.unwrap_or_default(),
            published_date: r.date,
            source: "serpapi".to_string(),
        }));

        results.truncate(limit);
        results
    }
}
