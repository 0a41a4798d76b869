use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, info};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// SCAN 每批的键数量
const SCAN_BATCH: usize = 200;

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    ttl: u64, // 默认 TTL（秒）
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时用同步连接做一次 PING
        let mut conn = client.get_connection().map_err(|e| {
            error!("Failed to connect to Redis server {}: {}", redis_config.url, e);
            format!("Redis connection failed: {e}")
        })?;
        let pong: String = redis::cmd("PING").query(&mut conn).map_err(|e| {
            error!("Failed to ping Redis server {}: {}", redis_config.url, e);
            format!("Redis ping failed: {e}")
        })?;
        debug!(
            "Redis connection test successful: {}, prefix: '{}', TTL: {}s",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            ttl: config.cache.default_ttl,
        })
    }

    async fn get_connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.get_connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        let result: redis::RedisResult<Option<String>> = conn.get(self.make_key(key)).await;
        match result {
            Ok(Some(data)) => {
                debug!("Successfully retrieved key: {}", key);
                CacheResult::Found(data)
            }
            Ok(None) => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.get_connection().await else {
            return;
        };

        let effective_ttl = if ttl == 0 { self.ttl } else { ttl };
        match conn
            .set_ex::<String, String, ()>(self.make_key(&key), value, effective_ttl)
            .await
        {
            Ok(_) => debug!("Inserted key into cache: {} (TTL: {}s)", key, effective_ttl),
            Err(e) => error!("Failed to insert key '{}' into cache: {}", key, e),
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.get_connection().await else {
            return;
        };

        match conn.del::<String, i32>(self.make_key(key)).await {
            Ok(count) if count > 0 => debug!("Removed key from cache: {}", key),
            Ok(_) => debug!("Key not found in cache for removal: {}", key),
            Err(e) => error!("Failed to remove key '{}': {}", key, e),
        }
    }

    /// 只清理本应用前缀下的键
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.get_connection().await else {
            return;
        };

        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0usize;
        loop {
            let scanned: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;

            let (next, keys) = match scanned {
                Ok(batch) => batch,
                Err(e) => {
                    error!("Failed to scan keys with pattern '{}': {}", pattern, e);
                    return;
                }
            };

            if !keys.is_empty() {
                match conn.del::<Vec<String>, usize>(keys).await {
                    Ok(count) => removed += count,
                    Err(e) => error!("Failed to delete scanned keys: {}", e),
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        info!("Redis cache invalidated, {} keys removed", removed);
    }
}
