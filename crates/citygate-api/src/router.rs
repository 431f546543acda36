//! Route definitions for the CityGate HTTP API.
//!
//! All routes are mounted under `/api`. Routes that need an authenticated
//! principal sit behind the `authenticate` middleware.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware::auth::authenticate;
use crate::state::AppState;

/// Build the `/api` router without outer layers.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(public_auth_routes())
        .merge(protected_routes(state.clone()))
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Auth endpoints that take no bearer token
fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
}

/// Endpoints requiring a live session
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/users/me/password", put(handlers::user::change_password))
        .route_layer(axum_middleware::from_fn_with_state(state, authenticate))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
