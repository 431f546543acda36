//! `AuthUser` extractor: the principal resolved for this request.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use citygate_entity::session::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated principal available in handlers.
///
/// Taken from the request extensions when the `authenticate` middleware
/// already ran, otherwise resolved from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl std::ops::Deref for AuthUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(AuthUser(principal.clone()));
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str().unwrap_or_default());

        let principal = state.authorizer.authorize(header).await?;
        parts.extensions.insert(principal.clone());
        Ok(AuthUser(principal))
    }
}
