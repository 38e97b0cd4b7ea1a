//! PostgreSQL-backed `LikeLedger` implementation using Diesel.
//!
//! The insert is a single statement with no preceding existence check; the
//! composite primary key on (post_id, user_id) rejects duplicates atomically
//! inside the database, which is the only place the check-then-insert race
//! between concurrent requests can be closed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{LikeLedger, LikeLedgerError};
use crate::domain::{PostId, UserId};

use super::models::NewLikeRow;
use super::pool::{DbPool, PoolError};
use super::schema::likes;

/// Diesel-backed implementation of the `LikeLedger` port.
#[derive(Clone)]
pub struct DieselLikeLedger {
    pool: DbPool,
}

impl DieselLikeLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain ledger errors.
fn map_pool_error(error: PoolError) -> LikeLedgerError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            LikeLedgerError::connection(message)
        }
    }
}

/// Map Diesel errors to domain ledger errors.
///
/// A unique violation is the expected signal for a duplicate like; foreign
/// key violations distinguish a missing post from a missing actor by
/// constraint name.
fn map_diesel_error(error: diesel::result::Error) -> LikeLedgerError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            LikeLedgerError::Duplicate
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            match info.constraint_name() {
                Some(name) if name.contains("user") => LikeLedgerError::MissingActor,
                _ => LikeLedgerError::MissingPost,
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            LikeLedgerError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => LikeLedgerError::query("database error"),
        DieselError::NotFound => LikeLedgerError::query("record not found"),
        _ => LikeLedgerError::query("database error"),
    }
}

#[async_trait]
impl LikeLedger for DieselLikeLedger {
    async fn insert(&self, post: &PostId, actor: &UserId) -> Result<(), LikeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewLikeRow {
            post_id: *post.as_uuid(),
            user_id: *actor.as_uuid(),
        };
        diesel::insert_into(likes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn remove(&self, post: &PostId, actor: &UserId) -> Result<bool, LikeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(likes::table.find((*post.as_uuid(), *actor.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn count(&self, post: &PostId) -> Result<i64, LikeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        likes::table
            .filter(likes::post_id.eq(post.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the constraint-to-error mapping, the heart of
    //! the ledger's duplicate handling.
    use super::*;
    use crate::outbound::persistence::test_support::database_error;
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    #[rstest]
    fn unique_violation_is_a_duplicate_like() {
        let error = database_error(DatabaseErrorKind::UniqueViolation, "likes_pkey");
        assert_eq!(map_diesel_error(error), LikeLedgerError::Duplicate);
    }

    #[rstest]
    #[case("likes_post_id_fkey", LikeLedgerError::MissingPost)]
    #[case("likes_user_id_fkey", LikeLedgerError::MissingActor)]
    fn foreign_key_violations_name_the_missing_side(
        #[case] constraint: &str,
        #[case] expected: LikeLedgerError,
    ) {
        let error = database_error(DatabaseErrorKind::ForeignKeyViolation, constraint);
        assert_eq!(map_diesel_error(error), expected);
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let error = database_error(DatabaseErrorKind::ClosedConnection, "");
        assert!(matches!(
            map_diesel_error(error),
            LikeLedgerError::Connection { .. }
        ));
    }

    #[rstest]
    fn other_database_errors_map_to_query_errors() {
        let error = database_error(DatabaseErrorKind::SerializationFailure, "");
        assert!(matches!(
            map_diesel_error(error),
            LikeLedgerError::Query { .. }
        ));
    }
}
