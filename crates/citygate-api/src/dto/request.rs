//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

use citygate_auth::AuthError;

/// Login request body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginRequest {
    pub fn check(&self) -> Result<(), AuthError> {
        self.validate()
            .map_err(|_| AuthError::Validation("Email and password are required".to_string()))
    }
}

/// Token refresh request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl RefreshRequest {
    pub fn check(&self) -> Result<(), AuthError> {
        if self.refresh_token.is_empty() {
            return Err(AuthError::Validation(
                "No refresh token provided".to_string(),
            ));
        }
        Ok(())
    }
}

/// Logout request body. The body itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Password change request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}
