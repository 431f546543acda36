//! Sign-up input and its validation.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AuthError;

const MISSING_FIELDS: &str = "Missing required user data fields";

/// A new account request.
///
/// Absent JSON fields deserialize as empty strings so they are reported as
/// missing rather than as a malformed body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Registration {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1), custom(function = "validate_email_format"))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1), custom(function = "validate_phone_digits"))]
    pub phone_number: String,
}

impl Registration {
    /// Check field presence, then email shape, then phone digits.
    pub fn check(&self) -> Result<(), AuthError> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) => Err(AuthError::Validation(first_failure(&errors))),
        }
    }
}

fn first_failure(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    let has = |field: &str, code: &str| {
        fields
            .get(field)
            .is_some_and(|errs| errs.iter().any(|e| e.code == code))
    };

    let required = ["first_name", "last_name", "email", "password", "phone_number"];
    if required.iter().any(|f| has(f, "length")) {
        return MISSING_FIELDS.to_string();
    }

    for field in ["email", "phone_number"] {
        if let Some(message) = fields
            .get(field)
            .and_then(|errs| errs.first())
            .and_then(|e| e.message.as_ref())
        {
            return message.to_string();
        }
    }

    MISSING_FIELDS.to_string()
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    let invalid =
        || ValidationError::new("email_format").with_message(Cow::Borrowed("Invalid email format"));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !dotted {
        return Err(invalid());
    }
    Ok(())
}

fn validate_phone_digits(phone: &str) -> Result<(), ValidationError> {
    if phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_digits")
            .with_message(Cow::Borrowed("Invalid phone number")))
    }
}
