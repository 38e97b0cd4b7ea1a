//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services and ports, and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TokenService;
use crate::domain::{AccountService, LikeService, PostService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub posts: PostService,
    pub likes: LikeService,
    /// Used by the auth extractor to resolve bearer tokens.
    pub tokens: Arc<dyn TokenService>,
    /// Policy switch: when enabled, `POST /posts` accepts an explicit
    /// `user_id` form field in place of a bearer token.
    pub open_posting: bool,
}

impl HttpState {
    /// Bundle the services and policies the HTTP surface needs.
    pub fn new(
        accounts: AccountService,
        posts: PostService,
        likes: LikeService,
        tokens: Arc<dyn TokenService>,
        open_posting: bool,
    ) -> Self {
        Self {
            accounts,
            posts,
            likes,
            tokens,
            open_posting,
        }
    }
}
