//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a default so an empty source set still
//! yields a runnable configuration.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod session;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::cache::CacheConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::session::SessionConfig;
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`CITYGATE__AUTH__JWT_SECRET`).
pub const ENV_PREFIX: &str = "CITYGATE";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Relational store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token signing and credential policy.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session window and permission fallback.
    #[serde(default)]
    pub session: SessionConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml`, the `config/<env>.toml` overlay, an
    /// optional explicit file, and environment variables prefixed with
    /// `CITYGATE__`. Later sources win.
    pub fn load(env: &str, explicit_path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));

        if let Some(path) = explicit_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject configurations the services cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.is_empty() || self.auth.jwt_refresh_secret.is_empty() {
            return Err(AppError::configuration(
                "auth.jwt_secret and auth.jwt_refresh_secret must be set",
            ));
        }
        if self.auth.jwt_secret == self.auth.jwt_refresh_secret {
            return Err(AppError::configuration(
                "auth.jwt_secret and auth.jwt_refresh_secret must differ",
            ));
        }
        if self.session.sliding_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "session.sliding_ttl_seconds must be greater than zero",
            ));
        }
        if self.cache.operation_timeout_ms == 0 {
            return Err(AppError::configuration(
                "cache.operation_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_lifetimes() {
        let config = AppConfig::default();
        assert_eq!(config.auth.access_ttl_seconds, 3600);
        assert_eq!(config.auth.refresh_ttl_days, 180);
        assert_eq!(config.session.sliding_ttl_seconds, 3600);
        assert_eq!(
            config.session.public_domain.as_deref(),
            Some("generalpublic")
        );
        assert_eq!(config.cache.provider, "memory");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let mut config = AppConfig::default();
        config.auth.jwt_refresh_secret = config.auth.jwt_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_sources_deserialize_to_defaults() {
        let parsed: AppConfig = config::Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("empty config should deserialize");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.worker.sync_strategy, worker::SyncStrategy::Replace);
    }
}
