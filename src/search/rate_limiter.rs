// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rate limiting for search requests

use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use super::types::SearchError;

const DEFAULT_PER_MINUTE: NonZeroU32 = NonZeroU32::MIN.saturating_add(59);

/// Outbound search quota, shared by every request on this node
pub struct SearchRateLimiter {
    limiter: Arc<GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    requests_per_minute: u32,
}

impl SearchRateLimiter {
    /// Zero falls back to 60 per minute
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(DEFAULT_PER_MINUTE);
        let quota = Quota::per_minute(rpm);
        let limiter = Arc::new(GovRateLimiter::direct(quota));

        Self {
            limiter,
            requests_per_minute,
        }
    }

    /// Take one slot from the quota
    ///
    /// The error carries the wait until the next slot, rounded up to a second.
    pub fn check(&self) -> Result<(), SearchError> {
        self.limiter.check().map_err(|not_until| {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            SearchError::RateLimited {
                retry_after_secs: wait.as_secs().max(1),
            }
        })
    }

    /// Quota as configured, before the zero fallback
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}
