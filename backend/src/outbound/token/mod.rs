//! Identity token adapters.

mod jwt_token_service;

pub use self::jwt_token_service::JwtTokenService;
