//! JWT claims structure used in access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user ID.
    pub sub: i64,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Expiration in epoch milliseconds, the value reported to clients.
    pub exp_ms: i64,
    /// Unique token id so two tokens issued in the same second differ.
    pub jti: Uuid,
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    /// Whether the token has expired at `now_ms`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.exp_ms
    }
}
