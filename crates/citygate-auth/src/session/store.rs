//! Session, refresh-record, and permission-set access over the cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use citygate_cache::keys;
use citygate_cache::provider::CacheManager;
use citygate_core::error::AppError;
use citygate_core::result::AppResult;
use citygate_core::traits::CacheProvider;

/// Typed operations over the session cache.
///
/// Keys:
/// - `session:<accessToken>` → user id, sliding TTL
/// - `user:<id>:sessions` → set of access tokens
/// - `refresh:<refreshToken>` → user id, refresh-lifetime TTL
/// - `user:<id>:refresh` → set of refresh tokens
/// - `permissions:<domain>` → set of permission names
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache: Arc<CacheManager>,
}

impl SessionStore {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    /// Record a session and index it under its user.
    ///
    /// Index members whose session has expired are dropped first.
    pub async fn create_session(
        &self,
        access_token: &str,
        user_id: i64,
        ttl: Duration,
    ) -> AppResult<()> {
        self.cache
            .set(&keys::session(access_token), &user_id.to_string(), ttl)
            .await?;

        let index = keys::user_sessions(user_id);
        self.prune_index(&index, keys::session).await?;
        self.cache
            .set_add(&index, &[access_token.to_string()])
            .await?;
        Ok(())
    }

    /// The user a session belongs to, or `None` if it is gone.
    pub async fn session_user(&self, access_token: &str) -> AppResult<Option<i64>> {
        self.cache
            .get(&keys::session(access_token))
            .await?
            .map(|raw| parse_user_id(&raw))
            .transpose()
    }

    /// Restart the session's TTL. Returns `false` if the session is gone.
    pub async fn extend_session(&self, access_token: &str, ttl: Duration) -> AppResult<bool> {
        self.cache.expire(&keys::session(access_token), ttl).await
    }

    /// Delete a session. Idempotent.
    pub async fn remove_session(&self, access_token: &str) -> AppResult<()> {
        self.cache.delete(&keys::session(access_token)).await
    }

    /// Drop a token from its user's session index.
    pub async fn unindex_session(&self, user_id: i64, access_token: &str) -> AppResult<()> {
        self.cache
            .set_remove(&keys::user_sessions(user_id), access_token)
            .await
    }

    /// Delete every session indexed under a user, then the index itself.
    /// Returns how many tokens were indexed.
    pub async fn remove_all_sessions(&self, user_id: i64) -> AppResult<usize> {
        let index = keys::user_sessions(user_id);
        let tokens = self.cache.set_members(&index).await?;
        for token in &tokens {
            self.cache.delete(&keys::session(token)).await?;
        }
        self.cache.delete(&index).await?;
        debug!(user_id, count = tokens.len(), "Removed all sessions for user");
        Ok(tokens.len())
    }

    /// Record a refresh token and index it under its user.
    ///
    /// Refresh records never slide, so the index lives as long as the newest
    /// record in it.
    pub async fn store_refresh(
        &self,
        refresh_token: &str,
        user_id: i64,
        ttl: Duration,
    ) -> AppResult<()> {
        self.cache
            .set(&keys::refresh(refresh_token), &user_id.to_string(), ttl)
            .await?;

        let index = keys::user_refresh_tokens(user_id);
        self.prune_index(&index, keys::refresh).await?;
        self.cache
            .set_add(&index, &[refresh_token.to_string()])
            .await?;
        self.cache.expire(&index, ttl).await?;
        Ok(())
    }

    pub async fn refresh_owner(&self, refresh_token: &str) -> AppResult<Option<i64>> {
        self.cache
            .get(&keys::refresh(refresh_token))
            .await?
            .map(|raw| parse_user_id(&raw))
            .transpose()
    }

    /// Delete a refresh record. A token without a record can never be
    /// exchanged again.
    pub async fn revoke_refresh(&self, user_id: i64, refresh_token: &str) -> AppResult<()> {
        self.cache.delete(&keys::refresh(refresh_token)).await?;
        self.cache
            .set_remove(&keys::user_refresh_tokens(user_id), refresh_token)
            .await
    }

    /// Delete every refresh record indexed under a user, then the index.
    /// Returns how many tokens were indexed.
    pub async fn remove_all_refresh_tokens(&self, user_id: i64) -> AppResult<usize> {
        let index = keys::user_refresh_tokens(user_id);
        let tokens = self.cache.set_members(&index).await?;
        for token in &tokens {
            self.cache.delete(&keys::refresh(token)).await?;
        }
        self.cache.delete(&index).await?;
        debug!(user_id, count = tokens.len(), "Removed all refresh tokens for user");
        Ok(tokens.len())
    }

    /// Drop index members whose backing key is gone.
    async fn prune_index(&self, index: &str, key_for: fn(&str) -> String) -> AppResult<()> {
        for member in self.cache.set_members(index).await? {
            if !self.cache.exists(&key_for(&member)).await? {
                self.cache.set_remove(index, &member).await?;
            }
        }
        Ok(())
    }

    /// Cached permission names for a domain. Empty if the set is absent.
    pub async fn domain_permissions(&self, domain: &str) -> AppResult<Vec<String>> {
        self.cache.set_members(&keys::permissions(domain)).await
    }
}

fn parse_user_id(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::cache(format!("Malformed user id in cache: '{raw}'")))
}
