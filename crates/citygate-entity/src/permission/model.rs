//! Domain → permission mapping rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One `(domain, permission)` pair produced by joining
/// `domain_access → roles → role_permissions → permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct DomainPermission {
    pub domain: String,
    pub permission_name: String,
}

impl DomainPermission {
    pub fn new(domain: impl Into<String>, permission_name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            permission_name: permission_name.into(),
        }
    }
}
