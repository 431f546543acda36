//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user as seen by the rest of the system.
///
/// The password hash lives on [`StoredUser`] and never leaves the
/// credential boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// Permission domain, derived from the email at registration.
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

/// A user row together with its password hash.
#[derive(Debug, Clone, FromRow)]
pub struct StoredUser {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Data required to insert a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub domain: String,
    pub password_hash: String,
}

impl NewUser {
    /// Everything after the last `@`, lowercased. Empty if there is no `@`.
    pub fn domain_from_email(email: &str) -> String {
        email
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_from_email() {
        assert_eq!(NewUser::domain_from_email("ana@City.gov"), "city.gov");
        assert_eq!(NewUser::domain_from_email("no-at-sign"), "");
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            id: 7,
            first_name: "Ana".into(),
            last_name: "Lima".into(),
            email: "ana@city.gov".into(),
            phone_number: "5550100".into(),
            domain: "city.gov".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstName"], "Ana");
        assert_eq!(json["phoneNumber"], "5550100");
        assert!(json.get("passwordHash").is_none());
    }
}
