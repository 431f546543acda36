//! Domain permission repository implementation.

use std::time::Duration;

use sqlx::PgPool;

use citygate_core::result::AppResult;
use citygate_entity::permission::DomainPermission;

use super::bounded;

/// Read side of the `domain_access → roles → role_permissions → permissions` graph.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PermissionRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Every `(domain, permission)` pair reachable through a role.
    pub async fn domain_permission_mappings(&self) -> AppResult<Vec<DomainPermission>> {
        bounded(
            self.query_timeout,
            "Failed to load domain permission mappings",
            sqlx::query_as::<_, DomainPermission>(
                "SELECT d.domain, p.name AS permission_name \
                 FROM domain_access d \
                 JOIN roles r ON d.role_id = r.id \
                 JOIN role_permissions rp ON r.id = rp.role_id \
                 JOIN permissions p ON rp.permission_id = p.id \
                 ORDER BY d.domain, p.name",
            )
            .fetch_all(&self.pool),
        )
        .await
    }
}
