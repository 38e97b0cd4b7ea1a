//! Filesystem implementation of the `ImageStore` port.
//!
//! Uploads land in a single flat directory that the server also exposes as
//! the `/uploads` static prefix. Stored names are freshly generated UUIDs,
//! so client-supplied filenames can neither collide nor traverse paths; only
//! a sanitised extension survives from the original name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ImageRef;
use crate::domain::ports::{ImageStore, ImageStoreError};

/// Public URL prefix under which stored images are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Longest extension carried over from the uploaded filename.
const EXTENSION_MAX: usize = 10;

/// Local-directory image store.
#[derive(Clone)]
pub struct FilesystemImageStore {
    dir: PathBuf,
}

impl FilesystemImageStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ImageStoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|err| ImageStoreError::io(format!("create upload dir: {err}")))?;
        Ok(Self { dir })
    }

    /// Directory uploads are written to; the static-file service mounts it.
    pub fn dir(&self) -> &Path {
        self.dir.as_path()
    }
}

/// Extract a safe lowercase extension from a client-supplied filename.
fn sanitised_extension(original_filename: &str) -> Option<String> {
    let extension = Path::new(original_filename).extension()?.to_str()?;
    if extension.is_empty()
        || extension.len() > EXTENSION_MAX
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(extension.to_lowercase())
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn store(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<ImageRef, ImageStoreError> {
        let stem = Uuid::new_v4().simple().to_string();
        let name = match sanitised_extension(original_filename) {
            Some(extension) => format!("{stem}.{extension}"),
            None => stem,
        };

        let path = self.dir.join(&name);
        std::fs::write(&path, bytes)
            .map_err(|err| ImageStoreError::io(format!("write image file: {err}")))?;

        Ok(ImageRef::new(format!("{UPLOADS_PREFIX}/{name}")))
    }
}
