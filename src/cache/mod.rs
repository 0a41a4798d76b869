//! 对象缓存
//!
//! 缓存后端以插件形式注册（moka 内存缓存、redis），启动时按配置选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错或值无法解析
    ExistsButNoValue,
}

impl<T> CacheResult<T> {
    pub fn found(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用默认过期时间
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::warn!("缓存值反序列化失败: key={}, error={}", key, e);
                    CacheResult::ExistsButNoValue
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    pub async fn insert<T: Serialize>(&self, key: impl Into<String>, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key.into(), raw, ttl).await,
            Err(e) => tracing::warn!("缓存值序列化失败: {}", e),
        }
    }
}

/// 缓存键
pub mod keys {
    pub fn user_token(token: &str) -> String {
        format!("user:{token}")
    }

    pub fn exercise(exercise_id: i64) -> String {
        format!("exercise:{exercise_id}")
    }
}

/// 注册缓存插件，构造函数在程序启动前执行
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache: $crate::errors::Result<$ty> = <$ty>::new()
                            .map_err($crate::errors::ClassNumError::cache_connection);
                        cache.map(|c| Box::new(c) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
