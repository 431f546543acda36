//! Password policy enforcement for new passwords.

use citygate_core::config::auth::AuthConfig;

use crate::error::AuthError;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Length is counted in characters, not bytes.
    pub fn validate(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.min_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length() {
        let validator = PasswordValidator::new(&AuthConfig::default());
        assert!(validator.validate("1234567").is_err());
        assert!(validator.validate("12345678").is_ok());
        assert!(validator.validate("ñññññññ").is_err());
    }

    #[test]
    fn test_message_names_the_limit() {
        let validator = PasswordValidator::new(&AuthConfig::default());
        let err = validator.validate("short").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Password must be at least 8 characters long"
        );
    }
}
