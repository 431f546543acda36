//! Request authorization: bearer header → [`Principal`].

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use citygate_core::config::session::SessionConfig;
use citygate_database::CredentialStore;
use citygate_entity::session::Principal;

use crate::error::AuthError;
use crate::session::SessionStore;

/// Extract the token from an `Authorization` header value.
///
/// The value must be exactly two space-separated parts with the scheme
/// `Bearer`.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let parts: Vec<&str> = header.split(' ').collect();
    let [scheme, token] = parts.as_slice() else {
        return Err(AuthError::TokenError);
    };
    if *scheme != "Bearer" {
        return Err(AuthError::MalformedToken);
    }
    Ok(*token)
}

/// Fail with `Forbidden` unless the principal holds `permission`.
pub fn require_permission(principal: &Principal, permission: &str) -> Result<(), AuthError> {
    if principal.has_permission(permission) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(permission.to_string()))
    }
}

/// Resolves bearer tokens into principals and slides their session TTL.
#[derive(Debug, Clone)]
pub struct Authorizer {
    sessions: Arc<SessionStore>,
    store: Arc<dyn CredentialStore>,
    sliding_ttl: Duration,
    public_domain: Option<String>,
}

impl Authorizer {
    pub fn new(
        config: &SessionConfig,
        sessions: Arc<SessionStore>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            sessions,
            store,
            sliding_ttl: Duration::from_secs(config.sliding_ttl_seconds),
            public_domain: config.public_domain.clone(),
        }
    }

    /// Authorize a request from its raw `Authorization` header.
    ///
    /// A missing session is terminal: the token is never verified
    /// cryptographically as a fallback. Unexpected backend failures while
    /// resolving the session or user become `InvalidToken`. Failure to read
    /// permissions is not fatal and yields an empty set.
    pub async fn authorize(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        self.authorize_for(header, None).await
    }

    /// Like [`authorize`](Self::authorize), but also requires `permission`.
    ///
    /// The permission is checked before the session TTL is extended, so a
    /// forbidden request does not keep the session alive.
    pub async fn authorize_for(
        &self,
        header: Option<&str>,
        permission: Option<&str>,
    ) -> Result<Principal, AuthError> {
        let token = parse_bearer(header)?;

        let user_id = match self.sessions.session_user(token).await {
            Ok(Some(id)) => id,
            Ok(None) => return Err(AuthError::SessionExpiredOrInvalid),
            Err(e) => {
                error!(error = %e, "Failed to read session");
                return Err(AuthError::InvalidToken);
            }
        };

        let user = match self.store.find_user_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AuthError::UserNotFound),
            Err(e) => {
                error!(user_id, error = %e, "Failed to load session user");
                return Err(AuthError::InvalidToken);
            }
        };

        let principal = Principal {
            permissions: self.resolve_permissions(&user.domain).await,
            user,
            access_token: token.to_string(),
        };
        if let Some(permission) = permission {
            require_permission(&principal, permission)?;
        }

        match self.sessions.extend_session(token, self.sliding_ttl).await {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::SessionExpiredOrInvalid),
            Err(e) => {
                error!(user_id, error = %e, "Failed to extend session");
                return Err(AuthError::InvalidToken);
            }
        }

        debug!(
            user_id,
            permissions = principal.permissions.len(),
            "Request authorized"
        );
        Ok(principal)
    }

    /// The domain's permission set, falling back to the public domain when
    /// the domain's set is empty. Cache errors yield an empty set.
    async fn resolve_permissions(&self, domain: &str) -> BTreeSet<String> {
        let own = match self.sessions.domain_permissions(domain).await {
            Ok(perms) => perms,
            Err(e) => {
                warn!(domain, error = %e, "Permission cache unavailable, continuing without permissions");
                return BTreeSet::new();
            }
        };
        if !own.is_empty() {
            return own.into_iter().collect();
        }

        let Some(public) = self.public_domain.as_deref().filter(|p| *p != domain) else {
            return BTreeSet::new();
        };
        match self.sessions.domain_permissions(public).await {
            Ok(perms) => perms.into_iter().collect(),
            Err(e) => {
                warn!(domain = public, error = %e, "Public permission set unavailable");
                BTreeSet::new()
            }
        }
    }
}
