//! In-memory cache implementation using dashmap.
//!
//! Expiry is tracked with `tokio::time::Instant` and enforced lazily on
//! access, so TTL behaviour follows tokio's clock (including paused time
//! in tests).

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use tokio::time::Instant;
use tracing::debug;

use citygate_core::error::AppError;
use citygate_core::result::AppResult;
use citygate_core::traits::cache::CacheProvider;

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Set(HashSet<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

fn wrong_type(key: &str) -> AppError {
    AppError::cache(format!(
        "WRONGTYPE operation against key '{key}' holding the wrong kind of value"
    ))
}

/// In-memory cache provider with string and set values.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheProvider {
    entries: Arc<DashMap<String, Entry>>,
}

impl MemoryCacheProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone out a live entry, dropping it first if it has expired.
    fn live(&self, key: &str) -> Option<Entry> {
        let now = Instant::now();
        let entry = self.entries.get(key).map(|e| e.value().clone())?;
        if entry.is_expired(now) {
            self.entries.remove_if(key, |_, e| e.is_expired(now));
            debug!(key, "Evicted expired cache entry");
            return None;
        }
        Some(entry)
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match self.live(key) {
            Some(Entry {
                value: Value::Str(s),
                ..
            }) => Ok(Some(s)),
            Some(_) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live(key).is_some())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired(now) => {
                entry.expires_at = Some(now + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .live(key)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    async fn set_add(&self, key: &str, members: &[String]) -> AppResult<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_expired(now) {
                    occupied.insert(Entry {
                        value: Value::Set(HashSet::new()),
                        expires_at: None,
                    });
                }
                match &mut occupied.get_mut().value {
                    Value::Set(set) => Ok(members
                        .iter()
                        .filter(|m| set.insert((*m).clone()))
                        .count() as u64),
                    Value::Str(_) => Err(wrong_type(key)),
                }
            }
            MapEntry::Vacant(vacant) => {
                let set: HashSet<String> = members.iter().cloned().collect();
                let added = set.len() as u64;
                vacant.insert(Entry {
                    value: Value::Set(set),
                    expires_at: None,
                });
                Ok(added)
            }
        }
    }

    async fn set_members(&self, key: &str) -> AppResult<Vec<String>> {
        match self.live(key) {
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => Ok(set.into_iter().collect()),
            Some(_) => Err(wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    async fn set_remove(&self, key: &str, member: &str) -> AppResult<()> {
        let mut now_empty = false;
        if let Some(mut entry) = self.entries.get_mut(key) {
            match &mut entry.value {
                Value::Set(set) => {
                    set.remove(member);
                    now_empty = set.is_empty();
                }
                Value::Str(_) => return Err(wrong_type(key)),
            }
        }
        if now_empty {
            self.entries
                .remove_if(key, |_, e| matches!(&e.value, Value::Set(s) if s.is_empty()));
        }
        Ok(())
    }

    async fn set_is_member(&self, key: &str, member: &str) -> AppResult<bool> {
        match self.live(key) {
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => Ok(set.contains(member)),
            Some(_) => Err(wrong_type(key)),
            None => Ok(false),
        }
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let now = Instant::now();
        match self.entries.remove(from) {
            Some((_, entry)) if !entry.is_expired(now) => {
                self.entries.insert(to.to_string(), entry);
                Ok(())
            }
            _ => Err(AppError::cache(format!("No such key: '{from}'"))),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_string_expires_after_ttl() {
        let cache = MemoryCacheProvider::new();
        cache
            .set("session:t", "7", Duration::from_secs(3600))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert_eq!(cache.get("session:t").await.unwrap().as_deref(), Some("7"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("session:t").await.unwrap().is_none());
        assert!(!cache.exists("session:t").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_restarts_window() {
        let cache = MemoryCacheProvider::new();
        cache
            .set("session:t", "7", Duration::from_secs(3600))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(1800)).await;
        assert!(
            cache
                .expire("session:t", Duration::from_secs(3600))
                .await
                .unwrap()
        );
        assert_eq!(
            cache.ttl("session:t").await.unwrap(),
            Some(Duration::from_secs(3600))
        );

        assert!(
            !cache
                .expire("session:missing", Duration::from_secs(10))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_set_operations() {
        let cache = MemoryCacheProvider::new();
        assert_eq!(
            cache
                .set_add("permissions:city.gov", &members(&["a", "b", "a"]))
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            cache
                .set_add("permissions:city.gov", &members(&["b", "c"]))
                .await
                .unwrap(),
            1
        );
        assert!(cache.set_is_member("permissions:city.gov", "c").await.unwrap());

        cache.set_remove("permissions:city.gov", "c").await.unwrap();
        let mut all = cache.set_members("permissions:city.gov").await.unwrap();
        all.sort();
        assert_eq!(all, members(&["a", "b"]));

        assert!(cache.set_members("permissions:none").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_removing_last_member_drops_key() {
        let cache = MemoryCacheProvider::new();
        cache.set_add("user:1:sessions", &members(&["t"])).await.unwrap();
        cache.set_remove("user:1:sessions", "t").await.unwrap();
        assert!(!cache.exists("user:1:sessions").await.unwrap());
    }

    #[tokio::test]
    async fn test_wrong_type_is_an_error() {
        let cache = MemoryCacheProvider::new();
        cache
            .set("session:t", "7", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(cache.set_members("session:t").await.is_err());
    }

    #[tokio::test]
    async fn test_rename_replaces_destination() {
        let cache = MemoryCacheProvider::new();
        cache.set_add("permissions:d", &members(&["old"])).await.unwrap();
        cache
            .set_add("permissions:d:staging", &members(&["new"]))
            .await
            .unwrap();

        cache
            .rename("permissions:d:staging", "permissions:d")
            .await
            .unwrap();

        assert_eq!(
            cache.set_members("permissions:d").await.unwrap(),
            members(&["new"])
        );
        assert!(!cache.exists("permissions:d:staging").await.unwrap());
        assert!(cache.rename("permissions:gone", "x").await.is_err());
    }
}
