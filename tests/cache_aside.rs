mod support;

use std::sync::Arc;
use std::time::Duration;

use admatch::application::repos::RepoError;
use admatch::application::retrieval::RetrievalError;
use admatch::cache::{CacheConfig, build_key};
use admatch::domain::entities::Advertisement;
use admatch::domain::filter::ConsumerFilter;

use support::{InMemoryStore, RecordingCache, active_ad, condition, retriever};

async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store
        .seed(active_ad(
            "AD 1",
            vec![condition((Some(20), Some(30)), &["F"], &["TW"], &["ios"])],
        ))
        .await;
    store.seed(active_ad("AD 2", Vec::new())).await;
    store
        .seed(active_ad(
            "AD 3",
            vec![condition((None, None), &["M"], &[], &["android"])],
        ))
        .await;
    store
}

fn filter() -> ConsumerFilter {
    ConsumerFilter {
        age: Some(24),
        gender: Some("F".to_string()),
        country: Some("TW".to_string()),
        platform: Some("ios".to_string()),
        ..Default::default()
    }
}

fn titles(ads: &[Advertisement]) -> Vec<&str> {
    ads.iter().map(|ad| ad.title.as_str()).collect()
}

#[tokio::test]
async fn second_identical_query_is_served_from_cache() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    let first = retriever.retrieve(&filter()).await.expect("first retrieval");
    let second = retriever.retrieve(&filter()).await.expect("second retrieval");

    assert_eq!(titles(&first), vec!["AD 1", "AD 2"]);
    assert_eq!(first, second);
    assert_eq!(store.find_calls(), 1);
    assert_eq!(cache.sets(), 1);
    assert!(cache.entry(&build_key(&filter())).await.is_some());
}

#[tokio::test]
async fn entries_are_written_with_the_configured_ttl() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    let config = CacheConfig {
        ttl: Duration::from_secs(42),
        ..Default::default()
    };
    let retriever = retriever(cache.clone(), store, &config);

    retriever.retrieve(&filter()).await.expect("retrieval");

    assert_eq!(retriever.ttl(), Duration::from_secs(42));
    assert_eq!(cache.last_ttl().await, Some(Duration::from_secs(42)));
}

#[tokio::test]
async fn different_filters_are_cached_separately() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    let narrow = retriever.retrieve(&filter()).await.expect("narrow");
    let broad = retriever
        .retrieve(&ConsumerFilter::default())
        .await
        .expect("broad");

    assert_eq!(titles(&narrow), vec!["AD 1", "AD 2"]);
    assert_eq!(titles(&broad), vec!["AD 1", "AD 2", "AD 3"]);
    assert_eq!(store.find_calls(), 2);
    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn empty_results_are_cached_too() {
    let store = Arc::new(InMemoryStore::new());
    let cache = Arc::new(RecordingCache::default());
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    assert!(retriever.retrieve(&filter()).await.expect("first").is_empty());
    assert!(retriever.retrieve(&filter()).await.expect("second").is_empty());
    assert_eq!(store.find_calls(), 1);
}

#[tokio::test]
async fn cached_results_stay_until_expiry_even_after_new_ads() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    let before = retriever.retrieve(&filter()).await.expect("before");
    store.seed(active_ad("AD 4", Vec::new())).await;
    let after = retriever.retrieve(&filter()).await.expect("after");

    assert_eq!(before, after);
    assert_eq!(store.find_calls(), 1);
}

#[tokio::test]
async fn unreachable_cache_falls_back_to_store() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    cache.fail_gets(true);
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    let first = retriever.retrieve(&filter()).await.expect("first");
    let second = retriever.retrieve(&filter()).await.expect("second");

    assert_eq!(titles(&first), vec!["AD 1", "AD 2"]);
    assert_eq!(first, second);
    assert_eq!(store.find_calls(), 2);
}

#[tokio::test]
async fn slow_cache_read_counts_as_miss() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    cache.delay_gets(Duration::from_millis(500)).await;
    let config = CacheConfig {
        operation_timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let retriever = retriever(cache.clone(), store.clone(), &config);

    let ads = retriever.retrieve(&filter()).await.expect("retrieval");

    assert_eq!(titles(&ads), vec!["AD 1", "AD 2"]);
    assert_eq!(store.find_calls(), 1);
}

#[tokio::test]
async fn unreadable_cache_entry_is_replaced() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    let key = build_key(&filter());
    cache.put_raw(&key, b"{not json").await;
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    let ads = retriever.retrieve(&filter()).await.expect("retrieval");

    assert_eq!(titles(&ads), vec!["AD 1", "AD 2"]);
    assert_eq!(store.find_calls(), 1);
    let rewritten = cache.entry(&key).await.expect("entry rewritten");
    let cached: Vec<Advertisement> = serde_json::from_slice(&rewritten).expect("valid payload");
    assert_eq!(cached, ads);
}

#[tokio::test]
async fn failed_cache_write_still_returns_results() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    cache.fail_sets(true);
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    let ads = retriever.retrieve(&filter()).await.expect("retrieval");

    assert_eq!(titles(&ads), vec!["AD 1", "AD 2"]);
    assert_eq!(cache.sets(), 1);
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn store_failure_propagates_and_caches_nothing() {
    let store = seeded_store().await;
    store.fail_queries(true);
    let cache = Arc::new(RecordingCache::default());
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    let err = retriever
        .retrieve(&filter())
        .await
        .expect_err("store failure surfaces");

    assert!(matches!(
        err,
        RetrievalError::Store(RepoError::Persistence(_))
    ));
    assert_eq!(cache.sets(), 0);
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn slow_store_times_out() {
    let store = seeded_store().await;
    store.delay_queries(Duration::from_millis(500)).await;
    let cache = Arc::new(RecordingCache::default());
    let config = CacheConfig {
        store_timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let retriever = retriever(cache.clone(), store, &config);

    let err = retriever
        .retrieve(&filter())
        .await
        .expect_err("store timeout surfaces");

    assert!(matches!(err, RetrievalError::Store(RepoError::Timeout)));
    assert_eq!(cache.sets(), 0);
}

#[tokio::test]
async fn pages_are_cached_per_window() {
    let store = seeded_store().await;
    let cache = Arc::new(RecordingCache::default());
    let retriever = retriever(cache.clone(), store.clone(), &CacheConfig::default());

    let first_page = ConsumerFilter {
        limit: 1,
        ..Default::default()
    };
    let second_page = ConsumerFilter {
        offset: 1,
        limit: 1,
        ..Default::default()
    };

    let first = retriever.retrieve(&first_page).await.expect("first page");
    let second = retriever.retrieve(&second_page).await.expect("second page");

    assert_eq!(titles(&first), vec!["AD 1"]);
    assert_eq!(titles(&second), vec!["AD 2"]);
    assert_eq!(store.find_calls(), 2);
}
