//! Port abstraction for the like ledger, the append/remove log of like facts.
//!
//! The ledger is where the one-like-per-(post, actor) invariant lives.
//! Implementations must push uniqueness enforcement into the storage layer's
//! atomic constraint check; a read-then-write pre-check is not an acceptable
//! implementation because two handlers can interleave between the read and
//! the write.

use async_trait::async_trait;

use crate::domain::post::PostId;
use crate::domain::user::UserId;

/// Errors raised by like ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LikeLedgerError {
    /// Ledger connection could not be established.
    #[error("like ledger connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("like ledger query failed: {message}")]
    Query { message: String },
    /// The (post, actor) pair already has a like row. Expected control flow,
    /// raised by the storage constraint rather than an application check.
    #[error("actor has already liked this post")]
    Duplicate,
    /// The referenced post does not exist (foreign key violation).
    #[error("post does not exist")]
    MissingPost,
    /// The referenced actor does not exist (foreign key violation).
    #[error("actor does not exist")]
    MissingActor,
}

impl LikeLedgerError {
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

/// Persistence port for like facts.
#[async_trait]
pub trait LikeLedger: Send + Sync {
    /// Record a like for `(post, actor)` with a single atomic insert.
    ///
    /// A second insert for the same pair fails with
    /// [`LikeLedgerError::Duplicate`] even when requests race, because the
    /// constraint check happens inside the storage engine.
    async fn insert(&self, post: &PostId, actor: &UserId) -> Result<(), LikeLedgerError>;

    /// Remove the like for `(post, actor)`, reporting whether a row existed.
    async fn remove(&self, post: &PostId, actor: &UserId) -> Result<bool, LikeLedgerError>;

    /// Live count of like rows for the post.
    async fn count(&self, post: &PostId) -> Result<i64, LikeLedgerError>;
}
