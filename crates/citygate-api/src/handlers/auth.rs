//! Auth handlers: register, login, refresh, logout, me.

use axum::Json;
use axum::extract::State;

use citygate_auth::Registration;
use citygate_entity::session::{AuthTokenPair, Principal};

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest};
use crate::dto::response::{AuthResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<Registration>,
) -> Result<Json<AuthResponse>, ApiError> {
    let outcome = state.tokens.register(req).await?;

    Ok(Json(AuthResponse {
        message: "User registered and logged in successfully".to_string(),
        outcome,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    req.check()?;
    let outcome = state.tokens.login(&req.email, &req.password).await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        outcome,
    }))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthTokenPair>, ApiError> {
    req.check()?;
    let tokens = state.tokens.refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<LogoutRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let refresh_token = body.and_then(|Json(req)| req.refresh_token);

    state
        .tokens
        .logout(&auth.access_token, auth.user_id(), refresh_token.as_deref())
        .await?;

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<Principal> {
    Json(auth.0)
}
