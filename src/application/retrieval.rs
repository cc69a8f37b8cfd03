//! Cache-aside retrieval of active advertisements.
//!
//! The cache is authoritative for an entry's lifetime: a hit is returned without
//! consulting the store, and writes never invalidate entries. Staleness is therefore
//! bounded by the configured TTL.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::repos::{AdsRepo, RepoError};
use crate::cache::{Cache, CacheConfig, CacheError, build_key};
use crate::domain::entities::Advertisement;
use crate::domain::filter::ConsumerFilter;

const TARGET: &str = "admatch::retrieval";

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("store query failed: {0}")]
    Store(#[source] RepoError),
    /// Write-path only. Reported to operators, never returned to callers.
    #[error("cache write failed: {0}")]
    Cache(#[source] CacheError),
}

#[derive(Clone)]
pub struct CacheAsideRetriever {
    cache: Arc<dyn Cache>,
    store: Arc<dyn AdsRepo>,
    ttl: Duration,
    cache_timeout: Duration,
    store_timeout: Duration,
}

impl CacheAsideRetriever {
    pub fn new(cache: Arc<dyn Cache>, store: Arc<dyn AdsRepo>, config: &CacheConfig) -> Self {
        Self {
            cache,
            store,
            ttl: config.ttl,
            cache_timeout: config.operation_timeout,
            store_timeout: config.store_timeout,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn retrieve(
        &self,
        filter: &ConsumerFilter,
    ) -> Result<Vec<Advertisement>, RetrievalError> {
        let key = build_key(filter);

        if let Some(ads) = self.lookup(&key).await {
            return Ok(ads);
        }

        counter!("admatch_store_query_total").increment(1);
        let ads = with_timeout(self.store_timeout, self.store.find_active(filter))
            .await
            .unwrap_or(Err(RepoError::Timeout))
            .map_err(RetrievalError::Store)?;

        if let Err(err) = self.populate(&key, &ads).await {
            counter!("admatch_cache_write_failure_total").increment(1);
            let failure = RetrievalError::Cache(err);
            warn!(
                target = TARGET,
                key = %key,
                error = %failure,
                "Serving store results without caching them"
            );
        }

        Ok(ads)
    }

    /// Cache read. Transport errors, timeouts and unreadable payloads all fall through to
    /// the store.
    async fn lookup(&self, key: &str) -> Option<Vec<Advertisement>> {
        let result = with_timeout(self.cache_timeout, self.cache.get(key))
            .await
            .unwrap_or(Err(CacheError::Timeout));

        match result {
            Ok(Some(payload)) => match serde_json::from_slice::<Vec<Advertisement>>(&payload) {
                Ok(ads) => {
                    counter!("admatch_cache_hit_total").increment(1);
                    debug!(target = TARGET, key, count = ads.len(), "Cache hit");
                    Some(ads)
                }
                Err(err) => {
                    counter!("admatch_cache_error_total").increment(1);
                    warn!(
                        target = TARGET,
                        key,
                        error = %err,
                        "Discarding unreadable cache entry"
                    );
                    None
                }
            },
            Ok(None) => {
                counter!("admatch_cache_miss_total").increment(1);
                debug!(target = TARGET, key, "Cache miss");
                None
            }
            Err(err) => {
                counter!("admatch_cache_error_total").increment(1);
                warn!(
                    target = TARGET,
                    key,
                    error = %err,
                    "Cache unavailable, falling back to store"
                );
                None
            }
        }
    }

    async fn populate(&self, key: &str, ads: &[Advertisement]) -> Result<(), CacheError> {
        let payload = Bytes::from(serde_json::to_vec(ads)?);
        with_timeout(self.cache_timeout, self.cache.set(key, payload, self.ttl))
            .await
            .unwrap_or(Err(CacheError::Timeout))
    }
}

/// `None` when the deadline elapsed before the operation finished.
async fn with_timeout<F: Future>(limit: Duration, operation: F) -> Option<F::Output> {
    tokio::time::timeout(limit, operation).await.ok()
}
