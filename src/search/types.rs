// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search results, locale and errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One hit, as handed to the agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    /// Empty for answer-box and knowledge-graph entries
    pub url: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    pub source: String,
}

/// Results of one query, with where they came from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Zero when served from cache
    pub search_time_ms: u64,
    pub provider: String,
    pub cached: bool,
}

/// Where searches appear to come from
///
/// Fixed per deployment; never derived from the incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchLocale {
    /// Free-form location, e.g. "Austin,Texas,United States"
    pub location: String,
    /// Interface language
    pub hl: String,
    /// Country
    pub gl: String,
}

impl Default for SearchLocale {
    fn default() -> Self {
        Self {
            location: "Austin,Texas,United States".to_string(),
            hl: "en".to_string(),
            gl: "us".to_string(),
        }
    }
}

/// Failures of the search layer
#[derive(Debug, Error)]
pub enum SearchError {
    /// Either SerpAPI or the local quota refused the call
    #[error("Search rate limited, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("SerpAPI error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Search timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("No API key configured for {provider}")]
    NoApiKey { provider: String },

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("Web search is disabled")]
    SearchDisabled,
}
