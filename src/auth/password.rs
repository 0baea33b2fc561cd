//! Argon2 password hashing.
//!
//! Raw passwords are hashed with a fresh salt before storage and never logged
//! or returned; verification goes through the PHC string so comparison is
//! handled by argon2 itself.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};

/// Hash a raw password into a PHC string.
///
/// # Errors
///
/// Returns an error if argon2 rejects the input (in practice only for inputs
/// beyond its length limits).
pub fn hash(raw: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|phc| phc.to_string())
}

/// Verify a raw password against a stored PHC string.
///
/// An unparsable hash verifies as `false` rather than erroring, so a corrupt
/// record behaves like a wrong password.
#[must_use]
pub fn verify(phc: &str, raw: &str) -> bool {
    PasswordHash::new(phc).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok()
    })
}
