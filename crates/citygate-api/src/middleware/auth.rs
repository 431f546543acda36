//! Bearer-token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// The raw `Authorization` header. A value that is not valid visible ASCII
/// reads as an empty string.
pub(crate) fn authorization_header(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default())
}

/// Resolves the `Authorization` header into a [`Principal`] and stores it
/// in the request extensions. Rejects with 401 on any failure.
///
/// A header that is not valid visible ASCII is treated like a header with
/// the wrong number of parts.
///
/// [`Principal`]: citygate_entity::session::Principal
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = state
        .authorizer
        .authorize(authorization_header(&request))
        .await?;

    tracing::debug!(
        user_id = principal.user_id(),
        permissions = principal.permissions.len(),
        "Request authenticated"
    );

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
