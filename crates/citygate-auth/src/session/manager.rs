//! Token lifecycle: login, registration, refresh, logout, password change.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use citygate_cache::provider::CacheManager;
use citygate_core::config::auth::AuthConfig;
use citygate_core::error::ErrorKind;
use citygate_core::types::Clock;
use citygate_database::CredentialStore;
use citygate_entity::session::AuthTokenPair;
use citygate_entity::user::{NewUser, User};

use crate::error::AuthError;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::registration::Registration;

use super::store::SessionStore;

/// Verified against when the email is unknown so both failure paths do
/// comparable work.
const DUMMY_PASSWORD: &str = "citygate-dummy-password";

/// A signed-in user with freshly issued tokens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    pub user: User,
    #[serde(flatten)]
    pub tokens: AuthTokenPair,
}

/// Issues, refreshes, and revokes credentials.
#[derive(Clone)]
pub struct TokenService {
    store: Arc<dyn CredentialStore>,
    sessions: Arc<SessionStore>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    clock: Arc<dyn Clock>,
    dummy_hash: String,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn CredentialStore>,
        cache: Arc<CacheManager>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher.hash_password(DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            sessions: Arc::new(SessionStore::new(cache)),
            encoder: Arc::new(JwtEncoder::new(config, clock.clone())),
            decoder: Arc::new(JwtDecoder::new(config)),
            hasher,
            validator: PasswordValidator::new(config),
            clock,
            dummy_hash,
        })
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// The user owning these credentials, or `None` for an unknown email or
    /// wrong password.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        match self.store.find_user_by_email(email).await? {
            Some(stored) => {
                let ok = self.hasher.verify_password(password, &stored.password_hash)?;
                Ok(ok.then_some(stored.user))
            }
            None => {
                let _ = self.hasher.verify_password(password, &self.dummy_hash);
                Ok(None)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let user = self
            .verify_credentials(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let tokens = self.issue_pair(user.id).await?;
        info!(user_id = user.id, "User logged in");
        Ok(AuthOutcome { user, tokens })
    }

    /// Create an account and sign it in.
    pub async fn register(&self, registration: Registration) -> Result<AuthOutcome, AuthError> {
        registration.check()?;

        if self
            .store
            .find_user_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailInUse);
        }
        self.validator.validate(&registration.password)?;

        let new_user = NewUser {
            domain: NewUser::domain_from_email(&registration.email),
            password_hash: self.hasher.hash_password(&registration.password)?,
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            phone_number: registration.phone_number,
        };

        let user = match self.store.create_user(new_user).await {
            Ok(user) => user,
            Err(e) if e.kind == ErrorKind::Conflict => return Err(AuthError::EmailInUse),
            Err(e) => return Err(e.into()),
        };

        let tokens = self.issue_pair(user.id).await?;
        info!(user_id = user.id, domain = %user.domain, "User registered");
        Ok(AuthOutcome { user, tokens })
    }

    /// Trade a refresh token for a new access token and session.
    ///
    /// The refresh token is not rotated: the returned pair carries the same
    /// refresh token and its original expiry.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokenPair, AuthError> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;
        if claims.is_expired_at(self.clock.now_millis()) {
            return Err(AuthError::RefreshExpired);
        }

        match self.sessions.refresh_owner(refresh_token).await? {
            Some(owner) if owner == claims.sub => {}
            Some(owner) => {
                warn!(
                    token_user = claims.sub,
                    record_user = owner,
                    "Refresh record belongs to a different user"
                );
                return Err(AuthError::InvalidRefreshToken);
            }
            None => {
                debug!(user_id = claims.sub, "Refresh token has no live record");
                return Err(AuthError::InvalidRefreshToken);
            }
        }

        let access = self.encoder.issue_access_token(claims.sub)?;
        self.sessions
            .create_session(&access.token, claims.sub, self.encoder.access_ttl())
            .await?;

        Ok(AuthTokenPair {
            access_token: access.token,
            refresh_token: refresh_token.to_string(),
            access_expires_at: access.expires_at_ms,
            refresh_expires_at: claims.exp_ms,
        })
    }

    /// Delete a session. Revoking an absent session succeeds.
    pub async fn revoke(&self, access_token: &str) -> Result<(), AuthError> {
        self.sessions.remove_session(access_token).await?;
        Ok(())
    }

    /// End one session, optionally revoking the refresh token issued with it.
    pub async fn logout(
        &self,
        access_token: &str,
        user_id: i64,
        refresh_token: Option<&str>,
    ) -> Result<(), AuthError> {
        self.revoke(access_token).await?;
        self.sessions.unindex_session(user_id, access_token).await?;
        if let Some(refresh_token) = refresh_token {
            self.sessions.revoke_refresh(user_id, refresh_token).await?;
        }
        info!(user_id, "User logged out");
        Ok(())
    }

    /// Delete every session of a user. Returns how many were indexed.
    pub async fn revoke_all(&self, user_id: i64) -> Result<usize, AuthError> {
        let count = self.sessions.remove_all_sessions(user_id).await?;
        info!(user_id, count, "Revoked all sessions");
        Ok(count)
    }

    /// Delete every refresh record of a user. Returns how many were indexed.
    pub async fn revoke_refresh_tokens(&self, user_id: i64) -> Result<usize, AuthError> {
        let count = self.sessions.remove_all_refresh_tokens(user_id).await?;
        info!(user_id, count, "Revoked all refresh tokens");
        Ok(count)
    }

    /// Replace a user's password and sign them in again.
    ///
    /// Every earlier session and refresh token of the user stops working.
    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<AuthTokenPair, AuthError> {
        if old_password.is_empty() || new_password.is_empty() {
            return Err(AuthError::Validation(
                "Old and new passwords are required".to_string(),
            ));
        }
        self.validator.validate(new_password)?;

        let stored = self
            .store
            .find_stored_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .hasher
            .verify_password(old_password, &stored.password_hash)?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let new_hash = self.hasher.hash_password(new_password)?;
        if !self.store.update_password_hash(user_id, &new_hash).await? {
            return Err(AuthError::UserNotFound);
        }

        self.revoke_all(user_id).await?;
        self.revoke_refresh_tokens(user_id).await?;
        let tokens = self.issue_pair(user_id).await?;
        info!(user_id, "Password changed");
        Ok(tokens)
    }

    async fn issue_pair(&self, user_id: i64) -> Result<AuthTokenPair, AuthError> {
        let access = self.encoder.issue_access_token(user_id)?;
        let refresh = self.encoder.issue_refresh_token(user_id)?;

        self.sessions
            .create_session(&access.token, user_id, self.encoder.access_ttl())
            .await?;
        self.sessions
            .store_refresh(&refresh.token, user_id, self.encoder.refresh_ttl())
            .await?;

        Ok(AuthTokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at_ms,
            refresh_expires_at: refresh.expires_at_ms,
        })
    }
}
