//! Password storage. Only argon2 PHC strings are kept; sign-in compares by
//! verifying the submitted password against the stored hash.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

fn argon_failure(op: &'static str) -> impl FnOnce(password_hash::Error) -> anyhow::Error {
    move |e| {
        error!(error = %e, op, "argon2 failure");
        anyhow::anyhow!("argon2 {op}: {e}")
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(argon_failure("hash"))
}

/// `Ok(false)` on mismatch; `Err` only when `stored` is not a PHC string.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(argon_failure("parse"))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(argon_failure("verify")(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_form_is_not_the_password() {
        let stored = hash_password("x").unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(verify_password("x", &stored).unwrap());
    }

    #[test]
    fn comparison_is_exact() {
        let stored = hash_password("hunter2").unwrap();
        assert!(!verify_password("Hunter2", &stored).unwrap());
        assert!(!verify_password("hunter2 ", &stored).unwrap());
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        assert_ne!(hash_password("x").unwrap(), hash_password("x").unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        let err = verify_password("anything", "plaintext-from-somewhere").unwrap_err();
        assert!(err.to_string().starts_with("argon2 parse"));
    }
}
