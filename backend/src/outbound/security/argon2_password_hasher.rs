//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are stored in PHC string format, salt included, so verification
//! needs nothing beyond the stored string. Comparison is delegated to the
//! primitive's own verify function rather than any string equality of ours.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id-backed password hasher with the crate's default parameters.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a hasher with default Argon2id parameters.
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        // Placeholder visitor rows store an empty hash; PasswordHash::new
        // rejects it here, so those accounts can never authenticate.
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hash_then_verify_round_trips() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("correct horse battery staple").expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse battery staple", &hash));
        assert!(!hasher.verify("wrong password", &hash));
    }

    #[rstest]
    fn salts_differ_between_hashes() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("pw").expect("hash");
        let second = hasher.hash("pw").expect("hash");
        assert_ne!(first, second, "each hash must use a fresh salt");
    }

    #[rstest]
    #[case("")]
    #[case("not-a-phc-string")]
    fn unparseable_stored_hashes_never_verify(#[case] stored: &str) {
        let hasher = Argon2PasswordHasher::new();
        assert!(!hasher.verify("anything", stored));
    }
}
