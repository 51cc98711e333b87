//! Rate-limited backend wrapper.
//!
//! Wraps any SearchBackend implementation with a governor rate limiter.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::{Result, ScoutError};
use crate::traits::backend::{SearchBackend, SearchRequest};

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A backend wrapper that spaces requests out to a fixed quota.
pub struct RateLimitedBackend<B: SearchBackend> {
    inner: B,
    limiter: Arc<DefaultRateLimiter>,
}

impl<B: SearchBackend> RateLimitedBackend<B> {
    /// Allow `requests_per_minute` requests, one at a time.
    pub fn new(backend: B, requests_per_minute: u32) -> Result<Self> {
        let quota = Quota::per_minute(non_zero(requests_per_minute, "requests_per_minute")?);
        Ok(Self::with_quota(backend, quota))
    }

    /// Allow `requests_per_minute` requests with bursts of up to `burst`.
    pub fn with_burst(backend: B, requests_per_minute: u32, burst: u32) -> Result<Self> {
        let quota = Quota::per_minute(non_zero(requests_per_minute, "requests_per_minute")?)
            .allow_burst(non_zero(burst, "burst")?);
        Ok(Self::with_quota(backend, quota))
    }

    /// Create with a custom quota.
    pub fn with_quota(backend: B, quota: Quota) -> Self {
        Self {
            inner: backend,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: SearchBackend> SearchBackend for RateLimitedBackend<B> {
    async fn search(&self, request: &SearchRequest) -> Result<String> {
        self.limiter.until_ready().await;
        self.inner.search(request).await
    }
}

fn non_zero(value: u32, name: &str) -> Result<NonZeroU32> {
    NonZeroU32::new(value).ok_or_else(|| ScoutError::Config(format!("{name} must be > 0")))
}

/// Extension trait for easy rate limiting.
pub trait SearchBackendExt: SearchBackend + Sized {
    /// Wrap this backend with a per-minute rate limit.
    fn rate_limited(self, requests_per_minute: u32) -> Result<RateLimitedBackend<Self>> {
        RateLimitedBackend::new(self, requests_per_minute)
    }
}

impl<B: SearchBackend + Sized> SearchBackendExt for B {}
