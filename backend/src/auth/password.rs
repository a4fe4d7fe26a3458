//! Password hashing
//!
//! New hashes are Argon2id. Verification also accepts bcrypt hashes
//! (`$2a$`, `$2b$`, `$2y$`) carried over from the previous user store.
//!
//! Both algorithms are CPU-intensive; async callers use the `_async`
//! variants, which run on the blocking pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if is_bcrypt(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| anyhow::anyhow!("Invalid bcrypt hash: {}", e));
        }

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

#[inline]
fn is_bcrypt(hash: &str) -> bool {
    hash.starts_with("$2")
}
