//! Port traits decoupling domain services from adapters.
//!
//! Each port owns its error enum; domain services map those errors onto the
//! public [`Error`](crate::domain::Error) taxonomy at the service boundary.

mod image_store;
mod like_ledger;
mod password_hasher;
mod post_repository;
mod token_service;
mod user_repository;

pub use self::image_store::{ImageStore, ImageStoreError};
pub use self::like_ledger::{LikeLedger, LikeLedgerError};
pub use self::password_hasher::{PasswordHashError, PasswordHasher};
pub use self::post_repository::{PostPersistenceError, PostRepository};
pub use self::token_service::{TokenError, TokenService};
pub use self::user_repository::{UserPersistenceError, UserRepository};
