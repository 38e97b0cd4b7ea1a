//! Port abstraction for storing uploaded images.
//!
//! The store is an opaque collaborator: it accepts bytes and hands back a
//! relative reference that the static-file layer can serve.

use async_trait::async_trait;

use crate::domain::post::ImageRef;

/// Errors raised by image store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageStoreError {
    /// The underlying storage failed.
    #[error("image store failed: {message}")]
    Io { message: String },
}

impl ImageStoreError {
    /// Create a storage error with the given message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

/// Blob storage port for post images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist uploaded bytes, returning the public relative reference.
    ///
    /// `original_filename` is only consulted for its extension; stored names
    /// are freshly generated so uploads can never collide or traverse paths.
    async fn store(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<ImageRef, ImageStoreError>;
}
