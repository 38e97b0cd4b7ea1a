//! Identity token payloads.
//!
//! Tokens are never persisted; each one is a self-contained, signed claim set
//! reconstructed from its signature on every request by the token service
//! port.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Claims carried inside a signed identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the authenticated user's id.
    pub sub: Uuid,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch. Verification rejects tokens
    /// past this instant; they are never silently accepted.
    pub exp: i64,
}

impl AccessClaims {
    /// The subject as a domain [`UserId`].
    pub const fn subject(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }
}

/// An encoded, signed token as presented in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    /// Wrap an encoded token string.
    pub const fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// Borrow the encoded form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the wrapper, yielding the encoded form.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SignedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
