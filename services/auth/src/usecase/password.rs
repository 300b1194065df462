use anyhow::anyhow;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::RngExt;

use crate::domain::types::TEMP_PASSWORD_LEN;
use crate::error::AuthServiceError;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Argon2id with a random salt; returns the PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; a stored hash that does not parse is an internal error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthServiceError> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|e| anyhow!("invalid password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Random alphanumeric password with at least one lowercase, uppercase and digit.
pub fn generate_temporary_password() -> String {
    let mut rng = rand::rng();
    let alphabet: Vec<u8> = [LOWER, UPPER, DIGITS].concat();
    let mut chars: Vec<u8> = (0..TEMP_PASSWORD_LEN)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect();

    let mut slots: Vec<usize> = Vec::with_capacity(3);
    while slots.len() < 3 {
        let i = rng.random_range(0..TEMP_PASSWORD_LEN);
        if !slots.contains(&i) {
            slots.push(i);
        }
    }
    for (slot, class) in slots.into_iter().zip([LOWER, UPPER, DIGITS]) {
        chars[slot] = class[rng.random_range(0..class.len())];
    }
    chars.into_iter().map(char::from).collect()
}
