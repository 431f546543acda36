//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing and credential policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for access tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from `jwt_secret`.
    #[serde(default = "default_jwt_refresh_secret")]
    pub jwt_refresh_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: u64,
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_refresh_secret: default_jwt_refresh_secret(),
            access_ttl_seconds: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

impl AuthConfig {
    pub fn refresh_ttl_seconds(&self) -> u64 {
        self.refresh_ttl_days * 24 * 60 * 60
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_jwt_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    3600
}

fn default_refresh_ttl() -> u64 {
    180
}

fn default_password_min() -> usize {
    8
}
