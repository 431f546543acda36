//! JWT signature verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use citygate_core::config::auth::AuthConfig;

use super::claims::{Claims, TokenType};
use crate::error::AuthError;

/// Verifies refresh token signatures and types.
///
/// Access tokens are never verified here: a request is authorized by its
/// `session:` cache entry alone, so only the refresh secret is held.
///
/// Expiry is not checked here: callers compare `Claims::exp_ms` against
/// their clock so the decision can be driven by an injected clock.
#[derive(Clone)]
pub struct JwtDecoder {
    refresh_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        Self {
            refresh_key: DecodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Verify a refresh token's signature and type.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.refresh_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token failed verification");
            AuthError::InvalidRefreshToken
        })?;
        if data.claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidRefreshToken);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use citygate_core::types::ManualClock;

    use super::*;
    use crate::jwt::JwtEncoder;

    fn config() -> AuthConfig {
        AuthConfig::default()
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let encoder = JwtEncoder::new(&config(), clock);
        let decoder = JwtDecoder::new(&config());

        let issued = encoder.issue_refresh_token(42).unwrap();
        let claims = decoder.decode_refresh_token(&issued.token).unwrap();
        assert_eq!(claims.user_id(), 42);
        assert_eq!(claims.exp_ms, issued.expires_at_ms);
        assert_eq!(
            issued.expires_at_ms - 1_700_000_000_000,
            180 * 24 * 60 * 60 * 1000
        );
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let encoder = JwtEncoder::new(&config(), Arc::new(ManualClock::new(0)));
        let decoder = JwtDecoder::new(&config());

        let access = encoder.issue_access_token(1).unwrap();
        assert!(matches!(
            decoder.decode_refresh_token(&access.token),
            Err(AuthError::InvalidRefreshToken)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let encoder = JwtEncoder::new(&config(), Arc::new(ManualClock::new(0)));
        let decoder = JwtDecoder::new(&config());

        let mut token = encoder.issue_refresh_token(1).unwrap().token;
        token.push('x');
        assert!(decoder.decode_refresh_token(&token).is_err());
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let encoder = JwtEncoder::new(&config(), Arc::new(ManualClock::new(0)));
        let a = encoder.issue_access_token(1).unwrap();
        let b = encoder.issue_access_token(1).unwrap();
        assert_ne!(a.token, b.token);
    }
}
