//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::user::{EmailAddress, NewUserRecord, User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The email address is already registered (unique constraint).
    #[error("email address is already registered")]
    DuplicateEmail,
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user row, returning the persisted record.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email
    /// unique constraint rejects the insert.
    async fn insert(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError>;

    /// Fetch a user by email, the login identifier.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Idempotently insert a placeholder row for an anonymous like actor.
    ///
    /// Implementations must treat an existing row with the same id as
    /// success, not a conflict, so concurrent first-time likers cannot race
    /// each other into an error.
    async fn ensure_placeholder(&self, record: &NewUserRecord)
    -> Result<(), UserPersistenceError>;
}
