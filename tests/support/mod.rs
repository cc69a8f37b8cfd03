#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use admatch::application::ads::AdService;
use admatch::application::allow_list::AllowListRegistry;
use admatch::application::repos::{AdsRepo, AdsWriteRepo, HealthRepo, RepoError};
use admatch::application::retrieval::CacheAsideRetriever;
use admatch::application::validation::ConditionValidator;
use admatch::cache::{Cache, CacheConfig, CacheError};
use admatch::domain::entities::{Advertisement, NewAdvertisement, TargetingCondition};
use admatch::domain::filter::ConsumerFilter;
use admatch::domain::matching::advertisement_matches;
use admatch::domain::types::AdId;
use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use tokio::sync::Mutex;

pub fn registry() -> Arc<AllowListRegistry> {
    Arc::new(AllowListRegistry::from_codes(
        ["M", "F"],
        ["TW", "JP", "US"],
        ["android", "ios", "web"],
    ))
}

/// Store keeping advertisements in memory and answering with the pure matching rule.
#[derive(Default)]
pub struct InMemoryStore {
    ads: Mutex<Vec<(Advertisement, Vec<TargetingCondition>)>>,
    next_id: AtomicI64,
    find_calls: AtomicUsize,
    failing: AtomicBool,
    healthy: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            ..Default::default()
        }
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn fail_queries(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub async fn delay_queries(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    /// Seed an advertisement directly, bypassing validation.
    pub async fn seed(&self, ad: NewAdvertisement) -> AdId {
        let id = AdId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let NewAdvertisement {
            title,
            start_at,
            end_at,
            conditions,
        } = ad;
        self.ads.lock().await.push((
            Advertisement {
                id,
                title,
                start_at,
                end_at,
            },
            conditions,
        ));
        id
    }

    pub async fn find_active_at(
        &self,
        filter: &ConsumerFilter,
        now: OffsetDateTime,
    ) -> Vec<Advertisement> {
        let ads = self.ads.lock().await;
        let mut matching: Vec<Advertisement> = ads
            .iter()
            .filter(|(ad, conditions)| advertisement_matches(ad, conditions, filter, now))
            .map(|(ad, _)| ad.clone())
            .collect();
        matching.sort_by_key(|ad| ad.id);
        matching
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(0))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .collect()
    }
}

#[async_trait]
impl AdsRepo for InMemoryStore {
    async fn find_active(
        &self,
        filter: &ConsumerFilter,
    ) -> Result<Vec<Advertisement>, RepoError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("connection refused"));
        }
        Ok(self.find_active_at(filter, OffsetDateTime::now_utc()).await)
    }
}

#[async_trait]
impl AdsWriteRepo for InMemoryStore {
    async fn insert_advertisement(&self, ad: NewAdvertisement) -> Result<AdId, RepoError> {
        Ok(self.seed(ad).await)
    }
}

#[async_trait]
impl HealthRepo for InMemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepoError::Timeout)
        }
    }
}

/// Cache recording every call, with switchable failures.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, Bytes>>,
    last_ttl: Mutex<Option<Duration>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
    fail_gets: AtomicBool,
    fail_sets: AtomicBool,
    get_delay: Mutex<Option<Duration>>,
}

impl RecordingCache {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn fail_gets(&self, failing: bool) {
        self.fail_gets.store(failing, Ordering::SeqCst);
    }

    pub fn fail_sets(&self, failing: bool) {
        self.fail_sets.store(failing, Ordering::SeqCst);
    }

    pub async fn delay_gets(&self, delay: Duration) {
        *self.get_delay.lock().await = Some(delay);
    }

    pub async fn entry(&self, key: &str) -> Option<Bytes> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn put_raw(&self, key: &str, value: &'static [u8]) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), Bytes::from_static(value));
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn last_ttl(&self) -> Option<Duration> {
        *self.last_ttl.lock().await
    }
}

#[async_trait]
impl Cache for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let delay = *self.get_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(CacheError::transport("connection reset by peer"));
        }
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(CacheError::transport("connection reset by peer"));
        }
        *self.last_ttl.lock().await = Some(ttl);
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

pub fn retriever(
    cache: Arc<RecordingCache>,
    store: Arc<InMemoryStore>,
    config: &CacheConfig,
) -> CacheAsideRetriever {
    CacheAsideRetriever::new(cache, store, config)
}

pub fn service(cache: Arc<RecordingCache>, store: Arc<InMemoryStore>) -> AdService {
    let retriever = retriever(cache, store.clone(), &CacheConfig::default());
    AdService::new(store, ConditionValidator::new(registry()), retriever)
}

/// An advertisement active for the next day.
pub fn active_ad(title: &str, conditions: Vec<TargetingCondition>) -> NewAdvertisement {
    let now = OffsetDateTime::now_utc();
    NewAdvertisement {
        title: title.to_string(),
        start_at: now - time::Duration::hours(1),
        end_at: now + time::Duration::days(1),
        conditions,
    }
}

pub fn condition(
    ages: (Option<i32>, Option<i32>),
    genders: &[&str],
    countries: &[&str],
    platforms: &[&str],
) -> TargetingCondition {
    let owned = |codes: &[&str]| codes.iter().map(|code| code.to_string()).collect();
    TargetingCondition {
        age_start: ages.0,
        age_end: ages.1,
        genders: owned(genders),
        countries: owned(countries),
        platforms: owned(platforms),
    }
}
