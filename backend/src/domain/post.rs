//! Post entities and validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::{UserId, Username};

/// Validation errors returned by [`PostDraft::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyContent,
    ContentTooLong { max: usize },
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "content must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Stable post identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`PostId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relative reference to a stored image, e.g. `/uploads/ab12cd.png`.
///
/// Produced by the image store adapter; the domain treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap a storage-produced relative path.
    pub const fn new(path: String) -> Self {
        Self(path)
    }

    /// Borrow the relative path.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum allowed length for a post title.
pub const TITLE_MAX: usize = 200;
/// Maximum allowed length for post content.
pub const CONTENT_MAX: usize = 20_000;

/// Validated title and content for a post awaiting creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: String,
    content: String,
}

impl PostDraft {
    /// Construct a draft from raw title/content inputs.
    pub fn try_from_parts(title: &str, content: &str) -> Result<Self, PostValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        if content.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        if content.chars().count() > CONTENT_MAX {
            return Err(PostValidationError::ContentTooLong { max: CONTENT_MAX });
        }
        Ok(Self {
            title: title.to_owned(),
            content: content.to_owned(),
        })
    }

    /// Validated title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Validated content.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}

/// Fields required to insert a post row.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: PostId,
    pub author_id: UserId,
    pub draft: PostDraft,
    pub image: Option<ImageRef>,
}

/// A persisted post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub image_path: Option<ImageRef>,
    pub created_at: DateTime<Utc>,
}

/// A post joined with its author's name and the live like count.
///
/// `total_likes` is computed from the like ledger at read time; there is no
/// stored counter that could drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub post: Post,
    pub publisher_name: Username,
    pub total_likes: i64,
}
