//! Key-value cache capability used by the retrieval path.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache transport error: {0}")]
    Transport(String),
    #[error("cache operation timed out")]
    Timeout,
    #[error("cache payload could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A shared key-value store with per-entry time-to-live.
///
/// `get` distinguishes a miss (`Ok(None)`) from a failure to reach the cache (`Err`).
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError>;
}
