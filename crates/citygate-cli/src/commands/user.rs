//! User and session management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use citygate_auth::SessionStore;
use citygate_core::config::AppConfig;
use citygate_core::error::AppError;
use citygate_entity::user::User;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show a user by email
    Show { email: String },
    /// End every session and refresh token of a user
    RevokeSessions { user_id: i64 },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    domain: String,
    phone: String,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: format!("{} {}", u.first_name, u.last_name),
            email: u.email.clone(),
            domain: u.domain.clone(),
            phone: u.phone_number.clone(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::Show { email } => {
            let store = super::open_store(config).await?;
            let stored = store
                .find_user_by_email(email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("No user with email '{email}'")))?;

            output::print_list(&[UserRow::from(&stored.user)], format);
        }
        UserCommand::RevokeSessions { user_id } => {
            let sessions = SessionStore::new(super::open_cache(config).await?);
            let session_count = sessions.remove_all_sessions(*user_id).await?;
            let refresh_count = sessions.remove_all_refresh_tokens(*user_id).await?;
            output::print_success(&format!(
                "Revoked {session_count} session(s) and {refresh_count} refresh token(s) for user {user_id}."
            ));
        }
    }

    Ok(())
}
