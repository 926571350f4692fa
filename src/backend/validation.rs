//! Credential checks run before login and signup requests
//!
//! All failing fields are reported together so the user can fix them in
//! one pass.

use crate::error::{Result, ZenmedicError};
use regex::Regex;
use std::sync::OnceLock;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("static email regex is valid"))
}

fn check_email(email: &str, errors: &mut Vec<String>) {
    if email.is_empty() {
        errors.push("Email is required".to_string());
    } else if !email_pattern().is_match(email) {
        errors.push("Email is invalid".to_string());
    }
}

fn check_password(password: &str, errors: &mut Vec<String>) {
    if password.is_empty() {
        errors.push("Password is required".to_string());
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
}

fn finish(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ZenmedicError::Validation(errors).into())
    }
}

/// Validate login credentials
///
/// # Errors
///
/// Returns `ZenmedicError::Validation` listing every failing field
///
/// # Examples
///
/// ```
/// use zenmedic::backend::validate_login;
///
/// assert!(validate_login("jo@example.com", "secret1").is_ok());
/// assert!(validate_login("jo", "123").is_err());
/// ```
pub fn validate_login(email: &str, password: &str) -> Result<()> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    check_password(password, &mut errors);
    finish(errors)
}

/// Validate signup fields
///
/// # Errors
///
/// Returns `ZenmedicError::Validation` listing every failing field
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<()> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    check_password(password, &mut errors);

    if name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }

    if confirm_password.is_empty() {
        errors.push("Please confirm your password".to_string());
    } else if password != confirm_password {
        errors.push("Passwords do not match".to_string());
    }

    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(result: Result<()>) -> Vec<String> {
        match result.unwrap_err().downcast::<ZenmedicError>() {
            Ok(ZenmedicError::Validation(errors)) => errors,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_login_valid() {
        assert!(validate_login("jo@example.com", "secret").is_ok());
    }

    #[test]
    fn test_login_reports_all_fields() {
        let errors = field_errors(validate_login("", ""));
        assert_eq!(errors, vec!["Email is required", "Password is required"]);
    }

    #[test]
    fn test_login_invalid_email_and_short_password() {
        let errors = field_errors(validate_login("jo@example", "12345"));
        assert_eq!(
            errors,
            vec!["Email is invalid", "Password must be at least 6 characters"]
        );
    }

    #[test]
    fn test_signup_valid() {
        assert!(validate_signup("Jo", "jo@example.com", "secret1", "secret1").is_ok());
    }

    #[test]
    fn test_signup_mismatched_confirmation() {
        let errors = field_errors(validate_signup("Jo", "jo@example.com", "secret1", "secret2"));
        assert_eq!(errors, vec!["Passwords do not match"]);
    }

    #[test]
    fn test_signup_missing_name_and_confirmation() {
        let errors = field_errors(validate_signup(" ", "jo@example.com", "secret1", ""));
        assert_eq!(
            errors,
            vec!["Name is required", "Please confirm your password"]
        );
    }
}
