//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod likes;
pub mod posts;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;

pub use error::ApiResult;
