//! CityGate Server: authentication, session, and permission service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use citygate_api::{AppState, build_app};
use citygate_auth::{Authorizer, TokenService};
use citygate_cache::CacheManager;
use citygate_core::config::AppConfig;
use citygate_core::error::AppError;
use citygate_core::types::{Clock, SystemClock};
use citygate_database::CredentialStore;
use citygate_worker::{CronScheduler, JobExecutor, PERMISSION_SYNC_JOB, PermissionSyncJob};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CITYGATE_ENV").unwrap_or_else(|_| "development".to_string());
    let explicit = std::env::var("CITYGATE_CONFIG").ok();
    AppConfig::load(&env, explicit.as_deref())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CityGate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Cache ────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 2: Credential store (+ migrations) ──────────────────
    tracing::info!(provider = %config.database.provider, "Opening credential store");
    let store: Arc<dyn CredentialStore> =
        citygate_database::open_store(&config.database, config.session.public_domain.as_deref())
            .await?;

    // ── Step 3: Auth services ────────────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tokens = Arc::new(TokenService::new(
        &config.auth,
        Arc::clone(&store),
        Arc::clone(&cache),
        clock,
    )?);
    let authorizer = Arc::new(Authorizer::new(
        &config.session,
        Arc::clone(tokens.sessions()),
        Arc::clone(&store),
    ));

    // ── Step 4: Permission sync worker ───────────────────────────
    let mut scheduler = if config.worker.enabled {
        Some(start_worker(&config, Arc::clone(&store), Arc::clone(&cache)).await?)
    } else {
        tracing::info!("Worker disabled; permission sync runs only via the CLI");
        None
    };

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = AppState::new(
        Arc::new(config.clone()),
        store,
        cache,
        tokens,
        authorizer,
    );
    let app = build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "CityGate server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler.as_mut() {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(result) => result?,
            Err(_) => tracing::warn!("Scheduler did not stop within the shutdown grace period"),
        }
    }

    tracing::info!("CityGate server stopped");
    Ok(())
}

/// Register the permission sync job, optionally run it once, and start cron.
async fn start_worker(
    config: &AppConfig,
    store: Arc<dyn CredentialStore>,
    cache: Arc<CacheManager>,
) -> Result<CronScheduler, AppError> {
    let sync_job = Arc::new(PermissionSyncJob::new(
        store,
        cache,
        config.worker.sync_strategy,
    ));

    if config.worker.sync_on_startup {
        if let Err(e) = sync_job.sync().await {
            tracing::error!(error = %e, "Startup permission sync failed; serving with existing cache");
        }
    }

    let mut executor = JobExecutor::new();
    executor.register(sync_job);

    let scheduler = CronScheduler::new(Arc::new(executor)).await?;
    scheduler
        .schedule(&config.worker.permission_sync_cron, PERMISSION_SYNC_JOB)
        .await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
