//! Response DTOs.

use serde::Serialize;

use citygate_auth::AuthOutcome;
use citygate_entity::session::AuthTokenPair;

/// A plain confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login and registration response: the user plus a token pair.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: AuthOutcome,
}

/// Token pair with a confirmation message.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub message: String,
    #[serde(flatten)]
    pub tokens: AuthTokenPair,
}

/// Health report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub cache: &'static str,
}
