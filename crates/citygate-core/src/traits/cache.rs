//! Cache provider trait for pluggable caching backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for cache backends (Redis or in-memory).
///
/// Keys passed in are logical keys; backends apply any configured prefix.
/// Every operation is atomic for a single key. Nothing is promised across
/// keys.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a string value. Returns `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a string value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key of any type. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Set the TTL on an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Remaining TTL of a key. `None` if the key is absent or has no expiry.
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Add members to a set, creating it if needed. Returns how many were new.
    async fn set_add(&self, key: &str, members: &[String]) -> AppResult<u64>;

    /// All members of a set. An absent key yields an empty vector.
    async fn set_members(&self, key: &str) -> AppResult<Vec<String>>;

    /// Remove a member from a set.
    async fn set_remove(&self, key: &str, member: &str) -> AppResult<()>;

    /// Check set membership.
    async fn set_is_member(&self, key: &str, member: &str) -> AppResult<bool>;

    /// Atomically rename `from` to `to`, replacing whatever `to` held.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
