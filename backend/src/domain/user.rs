//! User identity types and validation.
//!
//! Purpose: keep inbound payload parsing outside the domain by exposing
//! constructors that validate string inputs before any service or port sees
//! them. Serde derives exist so adapters can embed these types in DTOs.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, spaces, hyphens, or underscores",
            ),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like an address"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// Also identifies anonymous like actors: visitors mint a UUID client-side
/// and present it as their identity on like requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable account name shown as the publisher of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 2;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new(r"^[A-Za-z0-9 _-]+$").expect("username regex must compile")
    })
}

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(trimmed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised email address used as the login identifier.
///
/// ## Invariants
/// - Trimmed, lowercased, at most [`EMAIL_MAX`] characters.
/// - Shaped like `local@domain` with no whitespace. Full RFC 5322 parsing is
///   deliberately out of scope; the database unique constraint is the final
///   arbiter of identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 255;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email regex must compile"))
}

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`], lowercasing the input.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Borrow the validated value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A persisted user account.
///
/// The password hash never leaves the domain; response DTOs are built from
/// the other accessors only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from persisted parts.
    pub const fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            created_at,
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Account name shown on posts.
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Login identifier.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password hash in PHC string format. Empty for placeholder
    /// visitor accounts, which therefore can never log in.
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    /// Creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Fields required to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
}

impl NewUserRecord {
    /// Build the placeholder record backing an anonymous like actor.
    ///
    /// The username is derived from the actor id so it stays recognisable in
    /// joins, the email lives under the reserved `.invalid` TLD so it cannot
    /// collide with a real registration, and the empty password hash fails
    /// every verification attempt.
    pub fn placeholder(actor: UserId) -> Result<Self, UserValidationError> {
        let short = actor
            .as_uuid()
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect::<String>();
        Ok(Self {
            username: Username::new(format!("visitor-{short}"))?,
            email: EmailAddress::new(format!("{}@visitors.invalid", actor.as_uuid().simple()))?,
            password_hash: String::new(),
            id: actor,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("a", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    #[case("na!me", UserValidationError::UsernameInvalidCharacters)]
    fn invalid_usernames(#[case] input: &str, #[case] expected: UserValidationError) {
        let err = Username::new(input).expect_err("invalid username must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn overlong_username_is_rejected() {
        let err = Username::new("x".repeat(USERNAME_MAX + 1)).expect_err("too long");
        assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
    }

    #[rstest]
    #[case("  alice  ", "alice")]
    #[case("Bob_the-2nd", "Bob_the-2nd")]
    #[case("Ada Lovelace", "Ada Lovelace")]
    fn valid_usernames_are_trimmed(#[case] input: &str, #[case] expected: &str) {
        let name = Username::new(input).expect("valid username");
        assert_eq!(name.as_str(), expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("not-an-email", UserValidationError::InvalidEmail)]
    #[case("two@at@signs", UserValidationError::InvalidEmail)]
    #[case("spaces in@local.part", UserValidationError::InvalidEmail)]
    fn invalid_emails(#[case] input: &str, #[case] expected: UserValidationError) {
        let err = EmailAddress::new(input).expect_err("invalid email must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn emails_are_lowercased() {
        let email = EmailAddress::new("  Alice@Example.COM ").expect("valid email");
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[rstest]
    fn placeholder_record_is_well_formed() {
        let actor = UserId::random();
        let record = NewUserRecord::placeholder(actor).expect("placeholder must validate");
        assert_eq!(record.id, actor);
        assert!(record.username.as_str().starts_with("visitor-"));
        assert!(record.email.as_str().ends_with("@visitors.invalid"));
        assert!(record.password_hash.is_empty());
    }
}
