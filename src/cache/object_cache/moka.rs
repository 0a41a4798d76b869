use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

#[derive(Clone)]
struct CachedValue {
    value: String,
    ttl: Duration,
}

/// 按条目记录的 TTL 过期
struct PerEntryExpiry;

impl Expiry<String, CachedValue> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, CachedValue>,
    default_ttl: u64,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_settings(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, default TTL: {}s",
            max_capacity, default_ttl
        );
        Self { inner, default_ttl }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(cached) => {
                debug!("Successfully retrieved key: {}", key);
                CacheResult::Found(cached.value)
            }
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let effective_ttl = if ttl == 0 { self.default_ttl } else { ttl };
        self.inner
            .insert(
                key,
                CachedValue {
                    value,
                    ttl: Duration::from_secs(effective_ttl),
                },
            )
            .await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache.insert_raw("exercise:1".into(), "{}".into(), 0).await;
        assert_eq!(cache.get_raw("exercise:1").await, CacheResult::Found("{}".into()));

        cache.remove("exercise:1").await;
        assert_eq!(cache.get_raw("exercise:1").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let cache = MokaCacheWrapper::with_settings(100, 3600);
        cache.insert_raw("short".into(), "v".into(), 1).await;
        cache.insert_raw("long".into(), "v".into(), 0).await;

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
        assert_eq!(cache.get_raw("long").await, CacheResult::Found("v".into()));
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let cache: Box<dyn ObjectCache> = Box::new(MokaCacheWrapper::with_settings(100, 60));
        cache.insert("ids", &vec![1_i64, 2, 3], 0).await;
        let ids: Option<Vec<i64>> = cache.get("ids").await.found();
        assert_eq!(ids, Some(vec![1, 2, 3]));

        cache.insert_raw("broken".into(), "not json".into(), 0).await;
        let broken: CacheResult<Vec<i64>> = cache.get("broken").await;
        assert_eq!(broken, CacheResult::ExistsButNoValue);
    }
}
