use std::sync::OnceLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use password_hash::{rand_core::OsRng, SaltString};
use tracing::instrument;

use shared_models::error::AppError;

pub struct PasswordService;

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

impl PasswordService {
    /// Derive an argon2id digest with a fresh random salt.
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::Internal(format!("Failed to verify password: {}", e))),
        }
    }

    /// Spend one verification on a throwaway digest so that a missing account
    /// costs the same as a wrong password. Always reports a mismatch.
    #[instrument(skip(password))]
    pub fn verify_dummy(password: &str) -> bool {
        let dummy = DUMMY_HASH.get_or_init(|| Self::hash_password("odontocare-dummy-credential").ok());
        if let Some(hash) = dummy {
            let _ = Self::verify_password(password, hash);
        }
        false
    }
}
