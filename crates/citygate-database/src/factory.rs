//! Credential store selection from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use citygate_core::config::database::DatabaseConfig;
use citygate_core::error::AppError;
use citygate_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryCredentialStore;
use crate::migration::run_migrations;
use crate::store::{CredentialStore, PgCredentialStore};

/// Open the store named by `database.provider`.
///
/// `postgres` connects and, when `run_migrations` is set, applies pending
/// migrations. `memory` starts empty apart from the public grants for
/// `public_domain`.
pub async fn open_store(
    config: &DatabaseConfig,
    public_domain: Option<&str>,
) -> AppResult<Arc<dyn CredentialStore>> {
    match config.provider.as_str() {
        "postgres" => {
            let pool = DatabasePool::connect(config).await?;
            if config.run_migrations {
                run_migrations(pool.pool()).await?;
            }
            Ok(Arc::new(PgCredentialStore::new(pool)))
        }
        "memory" => {
            warn!("Using in-memory credential store; data is lost on exit");
            let store = match public_domain {
                Some(domain) => MemoryCredentialStore::with_public_grants(domain).await,
                None => MemoryCredentialStore::new(),
            };
            info!("In-memory credential store ready");
            Ok(Arc::new(store))
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider: '{other}'. Supported: postgres, memory"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use citygate_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_memory_provider_opens() {
        let config = DatabaseConfig {
            provider: "memory".into(),
            ..DatabaseConfig::default()
        };
        let store = open_store(&config, Some("generalpublic")).await.unwrap();
        assert!(store.health_check().await.unwrap());
        assert_eq!(store.domain_permission_mappings().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = DatabaseConfig {
            provider: "sqlite".into(),
            ..DatabaseConfig::default()
        };
        let err = open_store(&config, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
