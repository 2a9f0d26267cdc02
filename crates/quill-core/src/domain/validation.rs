//! Input rules shared by the HTTP layer.

use crate::error::DomainError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Check registration input before anything touches the store.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), DomainError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::Validation("Invalid email address".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_post(title: &str, content: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("Title is required".to_string()));
    }
    if content.trim().is_empty() {
        return Err(DomainError::Validation("Content is required".to_string()));
    }
    Ok(())
}

pub fn validate_comment(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation("Comment cannot be empty".to_string()));
    }
    Ok(())
}
