// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search service orchestration
//!
//! Coordinates the provider, caching, and rate limiting.

use std::time::Instant;
use tracing::{debug, info};

use super::cache::{CacheStats, SearchCache};
use super::config::SearchConfig;
use super::provider::SearchProvider;
use super::rate_limiter::SearchRateLimiter;
use super::serpapi::SerpApiProvider;
use super::types::{SearchError, SearchLocale, SearchResponse};

/// Search service shared across requests; holds the cache and the quota
pub struct SearchService {
    provider: Box<dyn SearchProvider>,
    cache: SearchCache,
    rate_limiter: SearchRateLimiter,
    config: SearchConfig,
}

impl SearchService {
    /// Create a SerpAPI-backed service from configuration
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let provider = SerpApiProvider::new(
            config.serpapi_api_key.clone().unwrap_or_default(),
            &config.serpapi_base_url,
            config.request_timeout_ms,
        )?;
        if !provider.is_available() {
            debug!("SerpAPI key not configured; search fallback will fail");
        }
        Ok(Self::with_provider(config, Box::new(provider)))
    }

    /// Create a service around any provider
    pub fn with_provider(config: SearchConfig, provider: Box<dyn SearchProvider>) -> Self {
        let cache = SearchCache::new(config.cache_ttl_secs, config.cache_max_entries);
        let rate_limiter = SearchRateLimiter::new(config.rate_limit_per_minute);

        Self {
            provider,
            cache,
            rate_limiter,
            config,
        }
    }

    /// Perform a search
    ///
    /// # Arguments
    /// * `query` - The search query
    /// * `locale` - Location and language to search from
    /// * `num_results` - Optional number of results (uses default if None)
    pub async fn search(
        &self,
        query: &str,
        locale: &SearchLocale,
        num_results: Option<usize>,
    ) -> Result<SearchResponse, SearchError> {
        if !self.config.enabled {
            return Err(SearchError::SearchDisabled);
        }

        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "empty query".to_string(),
            });
        }

        let num_results = num_results.unwrap_or(self.config.default_num_results);

        if let Some((results, provider)) = self.cache.get(query, locale) {
            debug!("Cache hit for query: {}", query);
            return Ok(SearchResponse {
                query: query.to_string(),
                results,
                search_time_ms: 0,
                provider,
                cached: true,
            });
        }

        if !self.provider.is_available() {
            return Err(SearchError::NoApiKey {
                provider: self.provider.name().to_string(),
            });
        }

        self.rate_limiter.check()?;

        let start = Instant::now();
        let results = self.provider.search(query, locale, num_results).await?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        self.cache
            .insert(query, locale, &results, self.provider.name());

        info!(
            "Search complete: {} results from {} in {}ms",
            results.len(),
            self.provider.name(),
            elapsed_ms
        );

        Ok(SearchResponse {
            query: query.to_string(),
            results,
            search_time_ms: elapsed_ms,
            provider: self.provider.name().to_string(),
            cached: false,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
