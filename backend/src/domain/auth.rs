//! Authentication payload types.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, UserValidationError, Username};

/// Domain error returned when an auth payload value is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// A username or email field failed validation.
    User(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is normalised via [`EmailAddress`].
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(AuthValidationError::User)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address suitable for user lookups.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl NewRegistration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let username = Username::new(username).map_err(AuthValidationError::User)?;
        let email = EmailAddress::new(email).map_err(AuthValidationError::User)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Account name to register.
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Login identifier to register.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password; hashed by the account service, never stored.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
