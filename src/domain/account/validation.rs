//! Account field validation

use thiserror::Error;

/// Errors that can occur during account field validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountValidationError {
    #[error("Account ID cannot be empty")]
    EmptyId,

    #[error("Account ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("Account ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("Email address cannot be empty")]
    EmptyEmail,

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
}

const MAX_ACCOUNT_ID_LENGTH: usize = 50;
const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate an account ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 50 characters
/// - Only alphanumeric characters and hyphens
pub fn validate_account_id(id: &str) -> Result<(), AccountValidationError> {
    if id.is_empty() {
        return Err(AccountValidationError::EmptyId);
    }

    if id.len() > MAX_ACCOUNT_ID_LENGTH {
        return Err(AccountValidationError::IdTooLong(MAX_ACCOUNT_ID_LENGTH));
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(AccountValidationError::InvalidIdCharacter(c));
        }
    }

    Ok(())
}

/// Validate an email address
///
/// A deliberately light check: a non-empty local part, a single '@', and a
/// dot somewhere in the domain part. Full RFC validation is not attempted.
pub fn validate_email(email: &str) -> Result<(), AccountValidationError> {
    if email.is_empty() {
        return Err(AccountValidationError::EmptyEmail);
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(AccountValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password meets the minimum length requirement
pub fn validate_password(password: &str) -> Result<(), AccountValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AccountValidationError::PasswordTooShort(
            MIN_PASSWORD_LENGTH,
        ));
    }

    Ok(())
}
