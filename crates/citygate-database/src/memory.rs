//! In-memory [`CredentialStore`] for tests and local development.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use citygate_core::error::AppError;
use citygate_core::result::AppResult;
use citygate_entity::permission::DomainPermission;
use citygate_entity::user::{NewUser, StoredUser, User};

use crate::store::CredentialStore;

/// Permissions of the seeded `public` role.
const PUBLIC_PERMISSIONS: [&str; 3] = ["view_events", "view_locations", "view_weather"];

#[derive(Debug, Default)]
struct Tables {
    users: Vec<StoredUser>,
    mappings: Vec<DomainPermission>,
    next_id: i64,
}

/// A credential store held entirely in process memory.
///
/// [`set_unavailable`](Self::set_unavailable) makes every call fail with a
/// database error, which lets callers exercise their outage paths.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the public role grants the initial
    /// migration seeds.
    pub async fn with_public_grants(domain: &str) -> Self {
        let store = Self::new();
        for permission in PUBLIC_PERMISSIONS {
            store.grant(domain, permission).await;
        }
        store
    }

    /// Add a `(domain, permission)` mapping as if granted through a role.
    pub async fn grant(&self, domain: &str, permission: &str) {
        let mut tables = self.tables.write().await;
        let mapping = DomainPermission::new(domain, permission);
        if !tables.mappings.contains(&mapping) {
            tables.mappings.push(mapping);
        }
    }

    /// Remove a `(domain, permission)` mapping.
    pub async fn revoke_grant(&self, domain: &str, permission: &str) {
        let mut tables = self.tables.write().await;
        tables
            .mappings
            .retain(|m| !(m.domain == domain && m.permission_name == permission));
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::database("Credential store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<StoredUser>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.find_stored_user_by_id(id).await?.map(|s| s.user))
    }

    async fn find_stored_user_by_id(&self, id: i64) -> AppResult<Option<StoredUser>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.user.id == id).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.user.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AppError::conflict("Email already in use"));
        }

        tables.next_id += 1;
        let user = User {
            id: tables.next_id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone_number: new_user.phone_number,
            domain: new_user.domain,
            created_at: Utc::now(),
        };
        tables.users.push(StoredUser {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> AppResult<bool> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        match tables.users.iter_mut().find(|u| u.user.id == id) {
            Some(stored) => {
                stored.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn domain_permission_mappings(&self) -> AppResult<Vec<DomainPermission>> {
        self.check_available()?;
        Ok(self.tables.read().await.mappings.clone())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }
}
