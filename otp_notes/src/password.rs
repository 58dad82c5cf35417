//! Argon2id password hashing

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::utils::UtilError;

/// Hash a password with a fresh random salt. Returns a PHC-format string.
pub(crate) fn hash_password(password: &str) -> Result<String, UtilError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UtilError::Crypto(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC-format hash.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, UtilError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| UtilError::Format(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(UtilError::Format(_))
        ));
    }
}
