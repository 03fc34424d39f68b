// src/auth/password.rs
// DOCUMENTATION: Password hashing and verification (Argon2id, PHC strings)

use crate::errors::DomicareError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, DomicareError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DomicareError::InternalError(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
/// Ok(false) on mismatch, Err when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, DomicareError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| DomicareError::InternalError(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
