//! The credential store boundary.

use async_trait::async_trait;

use citygate_core::result::AppResult;
use citygate_entity::permission::DomainPermission;
use citygate_entity::user::{NewUser, StoredUser, User};

use crate::connection::DatabasePool;
use crate::repositories::{PermissionRepository, UserRepository};

/// Relational persistence for users, password hashes, and the
/// domain → role → permission graph.
///
/// Implementations must enforce email uniqueness in `create_user` and
/// report a violation as an `ErrorKind::Conflict` error.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Look up a user and their password hash by email.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<StoredUser>>;

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Same as [`find_user_by_id`](Self::find_user_by_id) but including the hash.
    async fn find_stored_user_by_id(&self, id: i64) -> AppResult<Option<StoredUser>>;

    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Returns `false` if no user has this id.
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> AppResult<bool>;

    /// All `(domain, permissionName)` pairs.
    async fn domain_permission_mappings(&self) -> AppResult<Vec<DomainPermission>>;

    async fn health_check(&self) -> AppResult<bool>;
}

/// PostgreSQL-backed [`CredentialStore`].
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    db: DatabasePool,
    users: UserRepository,
    permissions: PermissionRepository,
}

impl PgCredentialStore {
    pub fn new(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        let timeout = db.query_timeout();
        Self {
            users: UserRepository::new(pool.clone(), timeout),
            permissions: PermissionRepository::new(pool, timeout),
            db,
        }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<StoredUser>> {
        self.users.find_by_email(email).await
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_stored_user_by_id(&self, id: i64) -> AppResult<Option<StoredUser>> {
        self.users.find_stored_by_id(id).await
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        self.users.create(&new_user).await
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> AppResult<bool> {
        self.users.update_password_hash(id, password_hash).await
    }

    async fn domain_permission_mappings(&self) -> AppResult<Vec<DomainPermission>> {
        self.permissions.domain_permission_mappings().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
