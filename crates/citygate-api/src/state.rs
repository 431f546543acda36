//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use citygate_auth::{Authorizer, TokenService};
use citygate_cache::CacheManager;
use citygate_core::config::AppConfig;
use citygate_database::CredentialStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Credential store (Postgres or in-memory)
    pub store: Arc<dyn CredentialStore>,
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// Login, registration, refresh, and logout
    pub tokens: Arc<TokenService>,
    /// Bearer header → principal resolution
    pub authorizer: Arc<Authorizer>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn CredentialStore>,
        cache: Arc<CacheManager>,
        tokens: Arc<TokenService>,
        authorizer: Arc<Authorizer>,
    ) -> Self {
        Self {
            config,
            store,
            cache,
            tokens,
            authorizer,
        }
    }
}
