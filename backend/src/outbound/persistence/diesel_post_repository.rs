//! PostgreSQL-backed `PostRepository` implementation using Diesel.
//!
//! Listing joins posts with author names and derives each like count from
//! the likes table at read time; there is no stored counter to drift.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{ImageRef, NewPost, Post, PostId, PostSummary, UserId, Username};

use super::models::{NewPostRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::{likes, posts, users};

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain post repository errors.
fn map_pool_error(error: PoolError) -> PostPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PostPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain post repository errors.
fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            PostPersistenceError::MissingAuthor
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PostPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => PostPersistenceError::query("database error"),
        DieselError::NotFound => PostPersistenceError::query("record not found"),
        _ => PostPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain Post.
fn row_to_post(row: PostRow) -> Post {
    Post {
        id: PostId::from_uuid(row.id),
        title: row.title,
        content: row.content,
        author_id: UserId::from_uuid(row.author_id),
        image_path: row.image_path.map(ImageRef::new),
        created_at: row.created_at,
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, new_post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewPostRow {
            id: *new_post.id.as_uuid(),
            title: new_post.draft.title(),
            content: new_post.draft.content(),
            author_id: *new_post.author_id.as_uuid(),
            image_path: new_post.image.as_ref().map(ImageRef::as_str),
        };
        let inserted: PostRow = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_post(inserted))
    }

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(PostRow, String)> = posts::table
            .inner_join(users::table)
            .order(posts::created_at.desc())
            .select((PostRow::as_select(), users::username))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Live counts, read on the same pooled connection as the rows.
        let counts: Vec<(Uuid, i64)> = likes::table
            .group_by(likes::post_id)
            .select((likes::post_id, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let counts: HashMap<Uuid, i64> = counts.into_iter().collect();

        rows.into_iter()
            .map(|(row, publisher)| {
                let total_likes = counts.get(&row.id).copied().unwrap_or(0);
                let publisher_name = Username::new(&publisher).map_err(|err| {
                    PostPersistenceError::query(format!("corrupted username in database: {err}"))
                })?;
                Ok(PostSummary {
                    post: row_to_post(row),
                    publisher_name,
                    total_likes,
                })
            })
            .collect()
    }
}
