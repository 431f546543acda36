//! Request-scoped authenticated identity.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::user::User;

/// The authenticated user plus the permissions resolved for their domain.
///
/// Built per request and never persisted. `permissions` is empty when the
/// permission cache could not be read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user: User,
    pub permissions: BTreeSet<String>,
    /// The access token this principal was resolved from.
    #[serde(skip)]
    pub access_token: String,
}

impl Principal {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}
