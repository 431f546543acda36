//! User repository implementation.

use std::time::Duration;

use sqlx::PgPool;

use citygate_core::error::{AppError, ErrorKind};
use citygate_core::result::AppResult;
use citygate_entity::user::{NewUser, StoredUser, User};

use super::bounded;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, phone_number, domain, created_at";

/// Repository for user lookups and credential writes.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl UserRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Find a user with their password hash by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<StoredUser>> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE LOWER(email) = LOWER($1)"
        );
        bounded(
            self.query_timeout,
            "Failed to find user by email",
            sqlx::query_as::<_, StoredUser>(&sql)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Find a user with their password hash by primary key.
    pub async fn find_stored_by_id(&self, id: i64) -> AppResult<Option<StoredUser>> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE id = $1");
        bounded(
            self.query_timeout,
            "Failed to find user by id",
            sqlx::query_as::<_, StoredUser>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        bounded(
            self.query_timeout,
            "Failed to find user by id",
            sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Insert a new user. A duplicate email maps to a `Conflict` error.
    pub async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (first_name, last_name, email, phone_number, domain, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );
        let insert = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.email)
            .bind(&new_user.phone_number)
            .bind(&new_user.domain)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool);

        match tokio::time::timeout(self.query_timeout, insert).await {
            Ok(Ok(user)) => Ok(user),
            Ok(Err(sqlx::Error::Database(db))) if db.is_unique_violation() => {
                Err(AppError::conflict("Email already in use"))
            }
            Ok(Err(e)) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to create user",
                e,
            )),
            Err(elapsed) => Err(AppError::with_source(
                ErrorKind::Timeout,
                "Failed to create user: query timed out",
                elapsed,
            )),
        }
    }

    /// Overwrite a user's password hash. Returns `false` if the user is gone.
    pub async fn update_password_hash(&self, id: i64, password_hash: &str) -> AppResult<bool> {
        let result = bounded(
            self.query_timeout,
            "Failed to update password",
            sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
                .bind(password_hash)
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
