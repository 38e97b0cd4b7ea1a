//! Registration and login orchestration over the credential-store ports.

use std::sync::Arc;

use tracing::error;

use super::auth::{LoginCredentials, NewRegistration};
use super::error::Error;
use super::ports::{
    PasswordHashError, PasswordHasher, TokenError, TokenService, UserPersistenceError,
    UserRepository,
};
use super::token::SignedToken;
use super::user::{NewUserRecord, User, UserId};

/// A successful login: the issued token plus the authenticated user.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub token: SignedToken,
    pub user: User,
}

/// Account registration and login service.
///
/// Passwords only ever exist in plaintext inside a request's scope; this
/// service hashes on the way in and delegates comparison to the hashing
/// primitive on the way back.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    /// Create a new service over the given ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// Fails with `Conflict` when the email is already registered. The
    /// storage unique constraint is the arbiter, so two concurrent
    /// registrations for the same email cannot both succeed.
    pub async fn register(&self, registration: &NewRegistration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let record = NewUserRecord {
            id: UserId::random(),
            username: registration.username().clone(),
            email: registration.email().clone(),
            password_hash,
        };
        self.users
            .insert(&record)
            .await
            .map_err(map_user_persistence_error)
    }

    /// Authenticate credentials and issue a signed token.
    ///
    /// Unknown email fails with `NotFound` and a wrong password with
    /// `Unauthorized`, preserving the original API's distinction between the
    /// two cases.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("no account found for this email"))?;

        if !self.hasher.verify(credentials.password(), user.password_hash()) {
            return Err(Error::unauthorized("invalid password"));
        }

        let token = self.tokens.issue(user.id()).map_err(map_token_error)?;
        Ok(AuthenticatedSession { token, user })
    }
}

/// Map user persistence failures onto the public error taxonomy.
///
/// Raw storage messages are logged server-side and never reach clients.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail => {
            Error::conflict("email address is already registered")
        }
        UserPersistenceError::Connection { .. } | UserPersistenceError::Query { .. } => {
            error!(%error, "user repository failure");
            Error::internal("user store unavailable")
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(%error, "password hashing failure");
    Error::internal("could not process credentials")
}

fn map_token_error(error: TokenError) -> Error {
    error!(%error, "token issuance failure");
    Error::internal("could not issue token")
}
