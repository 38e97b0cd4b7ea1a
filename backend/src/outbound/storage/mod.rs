//! Blob storage adapters.

mod filesystem_image_store;

pub use self::filesystem_image_store::{FilesystemImageStore, UPLOADS_PREFIX};
