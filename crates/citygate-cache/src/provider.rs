//! Cache manager that dispatches to the configured provider.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use citygate_core::config::cache::CacheConfig;
use citygate_core::error::AppError;
use citygate_core::result::AppResult;
use citygate_core::traits::cache::CacheProvider;

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Cache manager that wraps the configured cache provider.
///
/// Every call is bounded by `operation_timeout`; an elapsed deadline
/// surfaces as an `ErrorKind::Timeout` error.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
    operation_timeout: Duration,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache provider");
                Arc::new(crate::memory::MemoryCacheProvider::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self {
            inner,
            operation_timeout: Duration::from_millis(config.operation_timeout_ms),
        })
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self {
            inner: provider,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn provider(&self) -> &dyn CacheProvider {
        self.inner.as_ref()
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>> + Send,
    {
        match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(result) => result,
            Err(elapsed) => {
                warn!(
                    operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Cache operation timed out"
                );
                Err(AppError::from(elapsed))
            }
        }
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.bounded("set", self.inner.set(key, value, ttl)).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.bounded("expire", self.inner.expire(key, ttl)).await
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        self.bounded("ttl", self.inner.ttl(key)).await
    }

    async fn set_add(&self, key: &str, members: &[String]) -> AppResult<u64> {
        self.bounded("set_add", self.inner.set_add(key, members))
            .await
    }

    async fn set_members(&self, key: &str) -> AppResult<Vec<String>> {
        self.bounded("set_members", self.inner.set_members(key))
            .await
    }

    async fn set_remove(&self, key: &str, member: &str) -> AppResult<()> {
        self.bounded("set_remove", self.inner.set_remove(key, member))
            .await
    }

    async fn set_is_member(&self, key: &str, member: &str) -> AppResult<bool> {
        self.bounded("set_is_member", self.inner.set_is_member(key, member))
            .await
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        self.bounded("rename", self.inner.rename(from, to)).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.bounded("health_check", self.inner.health_check())
            .await
    }
}
