//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities and the transport-agnostic
//! services that enforce the blog's invariants. Keep types immutable and
//! document invariants and serialisation contracts (serde) in each type's
//! Rustdoc. Nothing in here knows about HTTP or SQL.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod like_service;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod token;
pub mod user;

pub use self::account_service::{AccountService, AuthenticatedSession};
pub use self::auth::{AuthValidationError, LoginCredentials, NewRegistration};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::like_service::{AnonymousLikerPolicy, LikeService};
pub use self::post::{
    ImageRef, NewPost, Post, PostDraft, PostId, PostSummary, PostValidationError,
};
pub use self::post_service::{ImageUpload, PostService};
pub use self::token::{AccessClaims, SignedToken};
pub use self::user::{
    EmailAddress, NewUserRecord, User, UserId, UserValidationError, Username,
};
