use std::sync::OnceLock;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(argon2::password_hash::Error),
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns the PHC string (`$argon2id$v=19$...`), which embeds the salt and
/// cost parameters.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash.
///
/// Any mismatch, including a stored hash that does not parse, is `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Spend one verification's worth of work against a throwaway hash.
///
/// Login calls this when the account does not exist so that unknown
/// accounts and wrong passwords take roughly the same time.
pub fn burn_verification(password: &str) {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();

    if let Some(hash) = DECOY.get_or_init(|| hash_password("dayplan-decoy").ok()) {
        let _ = verify_password(password, hash);
    }
}
