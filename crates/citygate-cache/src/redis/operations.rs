//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use citygate_core::error::{AppError, ErrorKind};
use citygate_core::result::AppResult;
use citygate_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
}

impl RedisCacheProvider {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

/// Redis rejects a zero expiry, so round sub-second TTLs up to one second.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        conn.get(&full_key).await.map_err(Self::map_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        let _: () = conn
            .set_ex(&full_key, value, ttl_secs(ttl))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        conn.exists(&full_key).await.map_err(Self::map_err)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        conn.expire(&full_key, ttl_secs(ttl) as i64)
            .await
            .map_err(Self::map_err)
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        // -2: missing key, -1: no expiry
        let secs: i64 = conn.ttl(&full_key).await.map_err(Self::map_err)?;
        Ok((secs >= 0).then(|| Duration::from_secs(secs as u64)))
    }

    async fn set_add(&self, key: &str, members: &[String]) -> AppResult<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        conn.sadd(&full_key, members).await.map_err(Self::map_err)
    }

    async fn set_members(&self, key: &str) -> AppResult<Vec<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        conn.smembers(&full_key).await.map_err(Self::map_err)
    }

    async fn set_remove(&self, key: &str, member: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        let _: () = conn.srem(&full_key, member).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_is_member(&self, key: &str, member: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn();
        conn.sismember(&full_key, member)
            .await
            .map_err(Self::map_err)
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let from_key = self.client.prefixed_key(from);
        let to_key = self.client.prefixed_key(to);
        let mut conn = self.client.conn();
        let _: () = conn.rename(&from_key, &to_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use citygate_core::config::cache::RedisCacheConfig;

    use super::*;

    #[test]
    fn test_ttl_rounds_up_to_one_second() {
        assert_eq!(ttl_secs(Duration::from_millis(10)), 1);
        assert_eq!(ttl_secs(Duration::from_secs(3600)), 3600);
    }

    /// Requires a reachable Redis at `REDIS_URL`.
    #[tokio::test]
    #[ignore]
    async fn test_session_roundtrip_against_redis() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let client = RedisClient::connect(&RedisCacheConfig {
            url,
            key_prefix: "citygate-test:".into(),
        })
        .await
        .unwrap();
        let cache = RedisCacheProvider::new(client);

        cache
            .set("session:it", "1", Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(cache.get("session:it").await.unwrap().as_deref(), Some("1"));
        assert!(cache.ttl("session:it").await.unwrap().is_some());

        cache.delete("session:it").await.unwrap();
        assert!(!cache.exists("session:it").await.unwrap());
    }
}
