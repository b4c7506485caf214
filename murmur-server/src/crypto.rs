//! Password hashing and session tokens

use anyhow::{bail, Result};
use murmur_core::common::MAX_PASSWORD_BYTES;
use rand::RngCore;

/// bcrypt cost factor
#[cfg(not(test))]
pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
/// bcrypt cost factor, lowered so tests don't spend seconds hashing
#[cfg(test)]
pub const BCRYPT_COST: u32 = 4;

/// Number of random bytes in a session token
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Hash a password with bcrypt. The salt is generated per call.
///
/// bcrypt only reads the first [`MAX_PASSWORD_BYTES`] bytes, so longer
/// passwords are refused instead of silently truncated.
pub fn hash_password(password: &str) -> Result<String> {
    if password.len() > MAX_PASSWORD_BYTES {
        bail!("Password exceeds {MAX_PASSWORD_BYTES} bytes");
    }
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

/// Verify a password against a bcrypt hash.
/// Passwords too long to have been hashed never match.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    Ok(bcrypt::verify(password, hash)?)
}

/// Generate an opaque, URL-safe bearer token.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64_url::encode(&bytes)
}

/// The form a session token is stored in. Raw tokens never hit the database.
pub fn hash_session_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}
