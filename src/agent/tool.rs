// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tools the agent may call

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::search::{SearchError, SearchLocale, SearchService};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool {tool} timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },

    #[error("Tool {tool} failed: {message}")]
    Failed { tool: String, message: String },
}

/// Something the agent can invoke with a text input
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses in its action blob
    fn name(&self) -> &str;

    /// One-line description shown to the model
    fn description(&self) -> &str;

    async fn call(&self, input: &str) -> Result<String, ToolError>;
}

const NO_RESULTS: &str = "No good search result found";

/// Web search over a fixed locale
pub struct SearchTool {
    service: Arc<SearchService>,
    locale: SearchLocale,
    num_results: usize,
}

impl SearchTool {
    pub fn new(service: Arc<SearchService>, locale: SearchLocale) -> Self {
        Self {
            service,
            locale,
            num_results: 5,
        }
    }

    pub fn locale(&self) -> &SearchLocale {
        &self.locale
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "a search engine. useful for when you need to answer questions about current events. \
         input should be a search query."
    }

    async fn call(&self, input: &str) -> Result<String, ToolError> {
        let response = self
            .service
            .search(input, &self.locale, Some(self.num_results))
            .await
            .map_err(|e| match e {
                SearchError::Timeout { timeout_ms } => ToolError::Timeout {
                    tool: "search".to_string(),
                    timeout_ms,
                },
                other => ToolError::Failed {
                    tool: "search".to_string(),
                    message: other.to_string(),
                },
            })?;

        if response.results.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        Ok(response
            .results
            .iter()
            .map(|r| {
                if r.url.is_empty() {
                    format!("{}: {}", r.title, r.snippet)
                } else {
                    format!("{}: {} ({})", r.title, r.snippet, r.url)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
