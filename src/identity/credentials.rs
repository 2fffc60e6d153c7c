//! Password hashing and random identifiers

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::error::{Result, TriageError};

/// Length in bytes of session tokens before hex encoding
pub const TOKEN_BYTES: usize = 32;

/// Argon2id password hashing producing PHC strings
#[derive(Debug, Clone, Default)]
pub struct PasswordHashing {
    params: Params,
}

impl PasswordHashing {
    /// Hashing with explicit cost parameters
    #[must_use]
    pub const fn with_params(params: Params) -> Self {
        Self { params }
    }

    /// Minimal-cost hashing for tests and local runs
    #[must_use]
    pub fn low_cost() -> Self {
        let params = Params::new(Params::MIN_M_COST.max(1024), 1, 1, None).unwrap_or_default();
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let mut salt = [0u8; 16];
        rand::rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| TriageError::Credential(format!("Salt encoding error: {e}")))?;

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| TriageError::Credential(format!("Password hashing error: {e}")))
    }

    /// Check `password` against a stored PHC string
    ///
    /// Cost parameters are read from the stored hash.
    pub fn verify(&self, password: &str, phc: &str) -> Result<bool> {
        let parsed = PasswordHash::new(phc)
            .map_err(|e| TriageError::Credential(format!("Stored hash is malformed: {e}")))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Lowercase hex of `len` random bytes
#[must_use]
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// New opaque session token
#[must_use]
pub fn generate_token() -> String {
    random_hex(TOKEN_BYTES)
}

/// New user identifier
#[must_use]
pub fn generate_user_id() -> String {
    format!("usr_{}", random_hex(12))
}
