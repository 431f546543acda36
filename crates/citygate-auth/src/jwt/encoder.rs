//! JWT token creation.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use citygate_core::config::auth::AuthConfig;
use citygate_core::error::AppError;
use citygate_core::types::Clock;

use super::claims::{Claims, TokenType};

/// A freshly signed token and its absolute expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at_ms: i64,
}

/// Creates signed access and refresh tokens.
///
/// Access and refresh tokens are signed with different secrets so one can
/// never be presented as the other.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            access_ttl: Duration::from_secs(config.access_ttl_seconds),
            refresh_ttl: Duration::from_secs(config.refresh_ttl_seconds()),
            clock,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access_token(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        self.issue(user_id, TokenType::Access)
    }

    pub fn issue_refresh_token(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        self.issue(user_id, TokenType::Refresh)
    }

    fn issue(&self, user_id: i64, token_type: TokenType) -> Result<IssuedToken, AppError> {
        let (key, ttl) = match token_type {
            TokenType::Access => (&self.access_key, self.access_ttl),
            TokenType::Refresh => (&self.refresh_key, self.refresh_ttl),
        };

        let now_ms = self.clock.now_millis();
        let exp_ms = now_ms + ttl.as_millis() as i64;
        let claims = Claims {
            sub: user_id,
            iat: now_ms / 1000,
            exp: exp_ms / 1000,
            exp_ms,
            jti: Uuid::new_v4(),
            token_type,
        };

        let token = encode(&Header::default(), &claims, key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at_ms: exp_ms,
        })
    }
}
