//! Cache key builders for every CityGate cache entry.
//!
//! These are logical keys. The Redis backend prepends its configured
//! prefix, so nothing here carries one.

// ── Session keys ───────────────────────────────────────────

/// `session:<accessToken> → userId`, TTL is the sliding session window.
pub fn session(access_token: &str) -> String {
    format!("session:{access_token}")
}

/// Set of every access token issued to a user.
pub fn user_sessions(user_id: i64) -> String {
    format!("user:{user_id}:sessions")
}

// ── Refresh keys ───────────────────────────────────────────

/// `refresh:<refreshToken> → userId`, TTL is the refresh lifetime.
pub fn refresh(refresh_token: &str) -> String {
    format!("refresh:{refresh_token}")
}

/// Set of every live refresh token issued to a user.
pub fn user_refresh_tokens(user_id: i64) -> String {
    format!("user:{user_id}:refresh")
}

// ── Permission keys ────────────────────────────────────────

/// `permissions:<domain> → set<permissionName>`.
pub fn permissions(domain: &str) -> String {
    format!("permissions:{domain}")
}

/// Staging set renamed over [`permissions`] by the staging sync strategy.
pub fn permissions_staging(domain: &str) -> String {
    format!("permissions:{domain}:staging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        assert_eq!(session("abc"), "session:abc");
        assert_eq!(user_sessions(42), "user:42:sessions");
        assert_eq!(refresh("r1"), "refresh:r1");
        assert_eq!(user_refresh_tokens(42), "user:42:refresh");
        assert_eq!(permissions("city.gov"), "permissions:city.gov");
        assert_eq!(
            permissions_staging("city.gov"),
            "permissions:city.gov:staging"
        );
    }
}
