//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use citygate_core::traits::cache::CacheProvider;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
///
/// 200 when both the cache and the credential store answer, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, cache) = tokio::join!(state.store.health_check(), state.cache.health_check());

    let database_ok = matches!(database, Ok(true));
    let cache_ok = matches!(cache, Ok(true));

    if let Err(e) = &database {
        tracing::warn!(error = %e, "Database health check failed");
    }
    if let Err(e) = &cache {
        tracing::warn!(error = %e, "Cache health check failed");
    }

    let status = if database_ok && cache_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let label = |ok: bool| if ok { "up" } else { "down" };

    (
        status,
        Json(HealthResponse {
            status: if status == StatusCode::OK { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database: label(database_ok),
            cache: label(cache_ok),
        }),
    )
}
