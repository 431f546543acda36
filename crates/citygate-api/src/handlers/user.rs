//! User self-service handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::ChangePasswordRequest;
use crate::dto::response::TokenResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// PUT /api/users/me/password
///
/// Every existing session of the user ends, including the one that made
/// this request. The response carries the replacement pair.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let tokens = state
        .tokens
        .change_password(auth.user_id(), &req.old_password, &req.new_password)
        .await?;

    Ok(Json(TokenResponse {
        message: "Password changed successfully".to_string(),
        tokens,
    }))
}
