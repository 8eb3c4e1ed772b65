// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! LRU search result cache with a TTL

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::types::{SearchLocale, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: String,
    locale: SearchLocale,
}

struct CachedEntry {
    results: Vec<SearchResult>,
    provider: String,
    inserted_at: Instant,
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Total entries in cache
    pub total: usize,
    /// Maximum cache capacity
    pub max: usize,
}

pub struct SearchCache {
    entries: Mutex<LruCache<CacheKey, CachedEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl SearchCache {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: Duration::from_secs(ttl_secs),
            max_entries: capacity.get(),
        }
    }

    /// Cached results and provider name, if present and fresh
    pub fn get(&self, query: &str, locale: &SearchLocale) -> Option<(Vec<SearchResult>, String)> {
        let mut entries = self.entries.lock().ok()?;
        let key = Self::cache_key(query, locale);

        let expired = entries.peek(&key)?.inserted_at.elapsed() > self.ttl;
        if expired {
            entries.pop(&key);
            return None;
        }

        entries
            .get(&key)
            .map(|e| (e.results.clone(), e.provider.clone()))
    }

    pub fn insert(&self, query: &str, locale: &SearchLocale, results: &[SearchResult], provider: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(
                Self::cache_key(query, locale),
                CachedEntry {
                    results: results.to_vec(),
                    provider: provider.to_string(),
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.entries.lock().map(|e| e.len()).unwrap_or(0);
        CacheStats {
            total,
            max: self.max_entries,
        }
    }

    /// Queries differing only in case or surrounding whitespace share an entry
    fn cache_key(query: &str, locale: &SearchLocale) -> CacheKey {
        CacheKey {
            query: query.trim().to_lowercase(),
            locale: locale.clone(),
        }
    }
}
