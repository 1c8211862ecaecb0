use argon2::{Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand_core::OsRng;

use crate::error::{Result, ServiceError};

/// Argon2id password hashing with a fresh random salt per hash.
#[derive(Clone)]
pub struct Credentials {
    argon2: Argon2<'static>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Credentials {
    /// Custom cost parameters: memory in KiB, iterations, lanes.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| ServiceError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// False on mismatch and on a stored hash that does not parse.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
