//! Password hashing and sign-up input checks.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use study_core::ValidationError;

use crate::error::{ApiError, Result};

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Normalized sign-up input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Trim and lowercase the e-mail, then check both fields.
pub fn validate(email: &str, password: &str) -> std::result::Result<Credentials, ValidationError> {
    let mut errors = Vec::new();

    let email = email.trim().to_lowercase();
    if email.is_empty() {
        errors.push(ValidationError::EmptyName { field: "email" });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ValidationError::NameTooShort {
            field: "password",
            min: MIN_PASSWORD_LEN,
        });
    }

    match errors.len() {
        0 => Ok(Credentials {
            email,
            password: password.to_string(),
        }),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Fields(errors)),
    }
}

/// Argon2id hash in PHC string form; the salt travels inside it.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}
