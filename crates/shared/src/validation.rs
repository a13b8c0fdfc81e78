//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

lazy_static! {
    static ref UPPERCASE: Regex = Regex::new(r"\p{Lu}").unwrap();
    static ref LOWERCASE: Regex = Regex::new(r"\p{Ll}").unwrap();
    static ref DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
}

/// Validates password strength: minimum length, one uppercase letter,
/// one lowercase letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let failure = if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(("password_length", "Password must be at least 8 characters"))
    } else if !UPPERCASE.is_match(password) {
        Some((
            "password_uppercase",
            "Password must contain at least one uppercase letter",
        ))
    } else if !LOWERCASE.is_match(password) {
        Some((
            "password_lowercase",
            "Password must contain at least one lowercase letter",
        ))
    } else if !DIGIT.is_match(password) {
        Some(("password_digit", "Password must contain at least one digit"))
    } else {
        None
    };

    match failure {
        Some((code, message)) => {
            let mut err = ValidationError::new(code);
            err.message = Some(message.into());
            Err(err)
        }
        None => Ok(()),
    }
}

/// Rejects strings made only of whitespace.
///
/// Length bounds are checked separately with `#[validate(length)]`; this
/// catches titles like `"   "` that satisfy the length rule.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
