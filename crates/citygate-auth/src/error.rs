//! Authentication and authorization failures.

use thiserror::Error;

use citygate_core::error::{AppError, ErrorKind};

/// Every way a credential, token, or session check can fail.
///
/// The `Display` text of each variant is the exact message returned to
/// clients.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header.
    #[error("No token provided")]
    MissingToken,
    /// Header is not exactly two space-separated parts.
    #[error("Token error")]
    TokenError,
    /// Two parts, but the scheme is not `Bearer`.
    #[error("Token malformatted")]
    MalformedToken,
    /// `session:<token>` is absent. Terminal.
    #[error("Session expired or invalid")]
    SessionExpiredOrInvalid,
    #[error("User not found")]
    UserNotFound,
    /// Catch-all for unexpected failures while resolving a request.
    #[error("Invalid token")]
    InvalidToken,
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Refresh token expired")]
    RefreshExpired,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Email already in use")]
    EmailInUse,
    #[error("{0}")]
    Validation(String),
    #[error("No permission to perform this action: {0}")]
    Forbidden(String),
    /// Credential store or cache failure outside the request-authorization path.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingToken
            | AuthError::TokenError
            | AuthError::MalformedToken
            | AuthError::SessionExpiredOrInvalid
            | AuthError::UserNotFound
            | AuthError::InvalidToken
            | AuthError::InvalidCredentials
            | AuthError::RefreshExpired
            | AuthError::InvalidRefreshToken => ErrorKind::Authentication,
            AuthError::EmailInUse => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::Forbidden(_) => ErrorKind::Authorization,
            AuthError::Store(e) => e.kind,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(inner) => inner,
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}
