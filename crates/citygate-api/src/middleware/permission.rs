//! Route guard requiring a named permission.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::authorization_header;

/// State for [`require_permission`]: the app state plus the permission a
/// route group needs.
#[derive(Clone)]
pub struct PermissionGate {
    state: AppState,
    permission: &'static str,
}

impl PermissionGate {
    pub fn new(state: AppState, permission: &'static str) -> Self {
        Self { state, permission }
    }
}

/// Authenticates the request and rejects with 403 unless the principal
/// holds the gate's permission. Replaces [`authenticate`] on gated routes:
///
/// ```ignore
/// router.route_layer(from_fn_with_state(
///     PermissionGate::new(state, "manage_events"),
///     require_permission,
/// ))
/// ```
///
/// [`authenticate`]: super::auth::authenticate
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = gate
        .state
        .authorizer
        .authorize_for(authorization_header(&request), Some(gate.permission))
        .await?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
