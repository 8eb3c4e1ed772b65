// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search backing the fallback stage
//!
//! - SerpAPI (Google engine) provider with a fixed locale
//! - TTL-based LRU result caching
//! - Per-minute outbound rate limiting

pub mod cache;
pub mod config;
pub mod provider;
pub mod rate_limiter;
pub mod serpapi;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::SearchConfig;
pub use provider::SearchProvider;
pub use serpapi::SerpApiProvider;
pub use service::SearchService;
pub use types::{SearchError, SearchLocale, SearchResponse, SearchResult};
