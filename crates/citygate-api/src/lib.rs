//! # citygate-api
//!
//! HTTP API layer for CityGate built on Axum.
//!
//! Provides the auth and account endpoints, the bearer-token
//! authentication middleware, the permission gate, extractors, DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
