//! Cache configuration.
//!
//! Selects the cache backend and bounds for the retrieval path via `admatch.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

// Default values for cache configuration
pub(crate) const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub(crate) const DEFAULT_MEMORY_CAPACITY: usize = 1024;
pub(crate) const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 200;
pub(crate) const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    Memory,
    Redis,
}

/// Resolved cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Required when `backend` is `redis`.
    pub redis_url: Option<String>,
    /// Lifetime of a cached result page. Writes never invalidate entries, so this is also
    /// the upper bound on staleness.
    pub ttl: Duration,
    /// Maximum entries kept by the in-process backend.
    pub memory_capacity: usize,
    /// Upper bound for a single cache get or set.
    pub operation_timeout: Duration,
    /// Upper bound for a store query on a cache miss.
    pub store_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis_url: None,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            operation_timeout: Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
        }
    }
}

impl From<&crate::config::Settings> for CacheConfig {
    fn from(settings: &crate::config::Settings) -> Self {
        let cache = &settings.cache;
        Self {
            backend: cache.backend,
            redis_url: cache.redis_url.clone(),
            ttl: cache.ttl,
            memory_capacity: cache.memory_capacity.get(),
            operation_timeout: cache.operation_timeout,
            store_timeout: settings.retrieval.store_timeout,
        }
    }
}

impl CacheConfig {
    /// Returns the memory capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn memory_capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
