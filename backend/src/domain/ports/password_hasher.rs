//! Port abstraction for password hashing.

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hashing primitive failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
}

impl PasswordHashError {
    /// Create a hashing error with the given message.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// Password hashing port.
///
/// Implementations produce irreversible salted hashes and delegate
/// comparison to the primitive's own verify function, so the service layer
/// never performs a timing-observable string comparison of its own.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh random salt.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// An unparseable stored hash (including the empty hash carried by
    /// placeholder visitor accounts) verifies as `false` rather than
    /// erroring, so such accounts can never authenticate.
    fn verify(&self, plaintext: &str, stored_hash: &str) -> bool;
}
