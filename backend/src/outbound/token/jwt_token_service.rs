//! JWT (HS256) implementation of the `TokenService` port.
//!
//! Tokens are self-contained: subject, issued-at, and expiry live in the
//! signed claims, so verification needs only the server-held secret. The
//! secret itself comes from configuration and its absence aborts startup
//! before this adapter can ever be constructed.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessClaims, SignedToken, UserId};

/// HS256-signing token service.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: i64,
}

impl JwtTokenService {
    /// Create a service signing with the given secret and token lifetime.
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            expiry_secs,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: &UserId) -> Result<SignedToken, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: *subject.as_uuid(),
            iat: now,
            exp: now + self.expiry_secs,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map(SignedToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| TokenError::invalid(err.to_string()))
    }
}
