// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search service settings

use super::serpapi::SERPAPI_BASE_URL;

/// Settings for the SerpAPI-backed search service
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub enabled: bool,
    /// Passed through unvalidated; calls fail with `NoApiKey` when unset
    pub serpapi_api_key: Option<String>,
    pub serpapi_base_url: String,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    /// Outbound calls allowed per minute, across all requests
    pub rate_limit_per_minute: u32,
    pub default_num_results: usize,
    /// Per-call HTTP timeout
    pub request_timeout_ms: u64,
}

impl SearchConfig {
    /// Zero TTLs, sizes, quotas and timeouts are rejected
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_ttl_secs == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }
        if self.cache_max_entries == 0 {
            return Err("Cache size must be greater than 0".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            return Err("Rate limit must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("Search timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.serpapi_api_key
            .as_deref()
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            serpapi_api_key: None,
            serpapi_base_url: SERPAPI_BASE_URL.to_string(),
            cache_ttl_secs: 3600,
            cache_max_entries: 1000,
            rate_limit_per_minute: 60,
            default_num_results: 10,
            request_timeout_ms: 10000,
        }
    }
}
