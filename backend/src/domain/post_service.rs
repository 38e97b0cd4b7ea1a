//! Post creation and listing over the post-store and image-store ports.

use std::sync::Arc;

use tracing::error;

use super::error::Error;
use super::ports::{ImageStore, ImageStoreError, PostPersistenceError, PostRepository};
use super::post::{NewPost, Post, PostDraft, PostId, PostSummary};
use super::user::UserId;

/// An uploaded image as received by the transport layer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied filename, consulted only for its extension.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Post creation and listing service.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    images: Arc<dyn ImageStore>,
}

impl PostService {
    /// Create a new service over the given ports.
    pub fn new(posts: Arc<dyn PostRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { posts, images }
    }

    /// Store the optional image, then insert the post row.
    ///
    /// The image is persisted first so the row never references a path that
    /// does not exist; an orphaned file from a failed insert is harmless.
    pub async fn create(
        &self,
        author: UserId,
        draft: PostDraft,
        upload: Option<ImageUpload>,
    ) -> Result<Post, Error> {
        let image = match upload {
            Some(upload) => Some(
                self.images
                    .store(&upload.filename, &upload.bytes)
                    .await
                    .map_err(map_image_error)?,
            ),
            None => None,
        };

        let new_post = NewPost {
            id: PostId::random(),
            author_id: author,
            draft,
            image,
        };
        self.posts
            .create(&new_post)
            .await
            .map_err(map_post_persistence_error)
    }

    /// All posts with author names and live like counts, newest first.
    pub async fn list(&self) -> Result<Vec<PostSummary>, Error> {
        self.posts
            .list_summaries()
            .await
            .map_err(map_post_persistence_error)
    }
}

fn map_post_persistence_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::MissingAuthor => Error::invalid_request("unknown post author"),
        PostPersistenceError::Connection { .. } | PostPersistenceError::Query { .. } => {
            error!(%error, "post repository failure");
            Error::internal("post store unavailable")
        }
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    error!(%error, "image store failure");
    Error::internal("could not store image")
}
