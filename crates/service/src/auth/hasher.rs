use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, PasswordHash, Version,
};
use rand::rngs::OsRng;
use tracing::warn;

use crate::errors::{StoreError, StoreResult};

/// One-way salted hashing capability consumed by the credential store.
pub trait SecretHasher: Send + Sync {
    fn hash(&self, secret: &str) -> StoreResult<String>;
    /// Must compare in constant time with respect to `secret`.
    fn verify(&self, digest: &str, secret: &str) -> bool;
}

/// Argon2id with a fresh OS-random salt per hash; digests are PHC strings.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon: Argon2<'static>,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self { argon: Argon2::default() }
    }
}

impl Argon2Hasher {
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> StoreResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| StoreError::Hashing(e.to_string()))?;
        Ok(Self { argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) })
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> StoreResult<Self> {
        Self::with_params(cfg.argon2_memory_kib, cfg.argon2_iterations, cfg.argon2_parallelism)
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> StoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| StoreError::Hashing(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, digest: &str, secret: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "stored password hash is not a valid PHC string");
                return false;
            }
        };
        // parameters come from the digest itself, so hashes made with other costs still verify
        self.argon.verify_password(secret.as_bytes(), &parsed).is_ok()
    }
}
