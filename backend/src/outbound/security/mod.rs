//! Credential-handling adapters.

mod argon2_password_hasher;

pub use self::argon2_password_hasher::Argon2PasswordHasher;
