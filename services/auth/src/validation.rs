//! Input validation for account forms
//!
//! Runs before any request is issued; a failure here never reaches the
//! network.

use regex::Regex;
use std::sync::OnceLock;

use common::{ClientError, ClientResult};

use crate::models::{LoginCredentials, NewAccount};

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate the create-account form, including the password confirmation
pub fn validate_registration(account: &NewAccount, confirm_password: &str) -> ClientResult<()> {
    if account.username.trim().is_empty()
        || account.email.trim().is_empty()
        || account.password.is_empty()
    {
        return Err(ClientError::validation("All fields are required."));
    }

    validate_email(account.email.trim()).map_err(ClientError::ValidationFailed)?;

    if account.password != confirm_password {
        return Err(ClientError::validation("Passwords do not match."));
    }

    Ok(())
}

/// Validate the login form
pub fn validate_login(credentials: &LoginCredentials) -> ClientResult<()> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ClientError::validation("Email and password are required."));
    }
    Ok(())
}
