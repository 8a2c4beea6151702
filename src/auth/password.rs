/// Password Hashing and Verification
///
/// Bcrypt with a random salt and fixed cost. Hashes are opaque strings; they
/// are never logged, never serialized into responses, and never compared
/// with `==` (verification goes through bcrypt's constant-time check).

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
// Bcrypt silently truncates input past 72 bytes.
const MAX_PASSWORD_LENGTH: usize = 72;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns error if the password is outside the length bounds or hashing
/// fails. Within bounds, hashing never fails for well-formed UTF-8 input;
/// the output differs between calls because the salt is random.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash
///
/// Returns `Ok(false)` on a mismatched password. Only a structurally
/// corrupt hash produces an error.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}
