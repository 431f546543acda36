//! Issued token pair.

use serde::{Deserialize, Serialize};

/// An access/refresh token pair with absolute epoch-millisecond expiries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenPair {
    /// Bearer token presented on every request.
    #[serde(rename = "token")]
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: i64,
    pub refresh_expires_at: i64,
}
