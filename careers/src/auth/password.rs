//! Password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{config::PasswordConfig, errors::Error};

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl From<&PasswordConfig> for Argon2Params {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }
}

/// Hash a password into a PHC string. CPU-heavy: call from `spawn_blocking`.
pub fn hash_password(input: &str, params: Argon2Params) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.to_argon2()?;

    let hash = argon2.hash_password(input.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash password: {e}"),
    })?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Verification uses the parameters embedded in the hash, not the current config.
pub fn verify_password(input: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Internal {
        operation: format!("parse password hash: {e}"),
    })?;

    Ok(Argon2::default().verify_password(input.as_bytes(), &parsed_hash).is_ok())
}
