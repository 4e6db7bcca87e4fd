//! Credential hashing with Argon2id
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so the parameters and salt travel with the hash and verification needs no
//! extra state.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Argon2id hasher with fixed cost parameters
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    /// 64 MiB memory, 3 iterations, 4 lanes, 32 byte output
    fn default() -> Self {
        Self {
            params: Params::new(65536, 3, 4, Some(32)).unwrap_or_default(),
        }
    }
}

impl CredentialHasher {
    /// Build a hasher with explicit cost parameters
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, Some(32))
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random 16-byte salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check `candidate` against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when the stored hash
    /// cannot be parsed.
    pub fn verify(&self, candidate: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

        // Parameters come from the PHC string, not from `self`
        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

/// Hash a password with the default parameters
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    CredentialHasher::default().hash(password)
}

/// Verify a password against a stored hash
pub fn verify_password(candidate: &str, hash: &str) -> Result<bool, PasswordError> {
    CredentialHasher::default().verify(candidate, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> CredentialHasher {
        CredentialHasher::with_params(8 * 1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("password123").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=65536,t=3,p=4"));
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        let hasher = light();
        let hash1 = hasher.hash("SamePassword").unwrap();
        let hash2 = hasher.hash("SamePassword").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("SamePassword", &hash1).unwrap());
        assert!(hasher.verify("SamePassword", &hash2).unwrap());
    }

    #[test]
    fn test_verify_uses_embedded_params() {
        let hash = light().hash("cheap-params").unwrap();
        assert!(hash.contains("m=8192,t=1,p=1"));
        assert!(CredentialHasher::default().verify("cheap-params", &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "invalid-hash-format");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_rejects_bad_params() {
        assert!(CredentialHasher::with_params(1, 0, 0).is_err());
    }
}
