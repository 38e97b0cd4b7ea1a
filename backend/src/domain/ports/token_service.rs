//! Port abstraction for issuing and verifying identity tokens.

use crate::domain::token::{AccessClaims, SignedToken};
use crate::domain::user::UserId;

/// Errors raised by token service adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token failed verification: bad signature, malformed, or expired.
    #[error("token rejected: {message}")]
    Invalid { message: String },
    /// Signing failed while issuing a token.
    #[error("token signing failed: {message}")]
    Signing { message: String },
}

impl TokenError {
    /// Create a verification failure with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a signing failure with the given message.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }
}

/// Token issue/verify port.
///
/// Both operations are pure computation over the server-held secret, so the
/// trait is synchronous; no store is consulted at verification time.
pub trait TokenService: Send + Sync {
    /// Sign a time-boxed token for the subject.
    fn issue(&self, subject: &UserId) -> Result<SignedToken, TokenError>;

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Expired tokens fail with [`TokenError::Invalid`]; they are never
    /// silently accepted.
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError>;
}
