//! Argon2 password hashing for stored user credentials.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::OnceLock;

use crate::error::DbResult;

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hashes a password into a PHC string with a random salt.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string.
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Runs one verification against a throwaway hash.
///
/// Called when no account matches a login email so the response takes as
/// long as a wrong password would.
pub fn verify_against_dummy(password: &str) {
    let dummy = DUMMY_HASH.get_or_init(|| hash_password("buttery-no-such-account").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        assert!(!verify_password("secret", "not-a-phc-string"));
        assert!(!verify_password("secret", ""));
    }

    #[test]
    fn test_dummy_hash_is_a_real_phc_string() {
        verify_against_dummy("password123");
        let dummy = DUMMY_HASH.get().cloned().flatten().unwrap();
        assert!(PasswordHash::new(&dummy).is_ok());
        assert!(!verify_password("password123", &dummy));
    }
}
