//! Password hashing.
//!
//! Argon2id with work factors supplied at construction. Each hash embeds a
//! fresh random salt, so hashing the same secret twice yields different PHC
//! strings; verification recomputes from the parameters stored in the hash.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng},
};

use super::AuthError;
use crate::config::AuthConfig;

/// One-way password hasher.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher from the configured work factors.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the parameters are out of the
    /// range argon2 accepts.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|_| AuthError::PasswordHash)?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// Verify a password against a stored hash.
    ///
    /// Returns `false` for any anomaly, including unparseable hashes; the
    /// underlying comparison is constant-time.
    #[must_use]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_hasher() -> PasswordHasher {
        // Minimal work factors so the test suite stays fast.
        let config = AuthConfig {
            jwt_secret: SecretString::from("k".repeat(32)),
            token_ttl_hours: 24,
            hash_memory_kib: 8,
            hash_iterations: 1,
            hash_parallelism: 1,
        };
        PasswordHasher::new(&config).unwrap()
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hasher = test_hasher();
        let hash = hasher.hash("p1").unwrap();
        assert_ne!(hash, "p1");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_roundtrip() {
        let hasher = test_hasher();
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &hash));
        assert!(!hasher.verify("wrong horse", &hash));
    }

    #[test]
    fn test_same_input_different_hashes() {
        // Embedded random salt: two hashes of the same input must differ.
        let hasher = test_hasher();
        let first = hasher.hash("p1").unwrap();
        let second = hasher.hash("p1").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("p1", &first));
        assert!(hasher.verify("p1", &second));
    }

    #[test]
    fn test_verify_garbage_hash_is_false() {
        let hasher = test_hasher();
        assert!(!hasher.verify("p1", "not-a-phc-string"));
        assert!(!hasher.verify("p1", ""));
    }
}
