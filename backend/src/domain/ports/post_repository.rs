//! Port abstraction for post persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::post::{NewPost, Post, PostSummary};

/// Persistence errors raised by post repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostPersistenceError {
    /// Repository connection could not be established.
    #[error("post repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("post repository query failed: {message}")]
    Query { message: String },
    /// The referenced author does not exist (foreign key violation).
    #[error("post author does not exist")]
    MissingAuthor,
}

impl PostPersistenceError {
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

/// Persistence port for posts.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post row, returning the persisted record.
    async fn create(&self, new_post: &NewPost) -> Result<Post, PostPersistenceError>;

    /// All posts joined with author name and live like count, newest first.
    ///
    /// Counts must come from the like ledger's rows at read time; adapters
    /// must not maintain a stored counter.
    async fn list_summaries(&self) -> Result<Vec<PostSummary>, PostPersistenceError>;
}
