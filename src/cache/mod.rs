//! Admatch cache system
//!
//! Result pages of active-advertisement queries are cached under a canonical key built
//! from the consumer filter. Two backends implement the [`Cache`] capability:
//!
//! - **memory**: in-process LRU with per-entry expiry, for single-instance deployments
//! - **redis**: shared cache for multi-instance deployments
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! backend = "redis"
//! redis_url = "redis://127.0.0.1:6379"
//! ttl_seconds = 300
//! ```

mod config;
mod keys;
mod memory;
mod redis_cache;
mod store;

pub use config::{CacheBackend, CacheConfig};
pub use keys::{ACTIVE_ADS_PREFIX, build_key};
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
pub use store::{Cache, CacheError};

pub(crate) use config::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_MEMORY_CAPACITY, DEFAULT_OPERATION_TIMEOUT_MS,
    DEFAULT_STORE_TIMEOUT_MS,
};
