//! Environment-driven application configuration.
//!
//! The process refuses to start without a database URL or signing secret:
//! issuing unsigned tokens or limping along without a store would be worse
//! than exiting. Everything else has a default matching the original
//! deployment.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Errors raised while loading configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent.
    #[error("required environment variable {name} is not set")]
    MissingVariable { name: &'static str },
    /// A variable is present but unparseable.
    #[error("environment variable {name} is invalid: {message}")]
    InvalidVariable { name: &'static str, message: String },
}

impl ConfigError {
    fn missing(name: &'static str) -> Self {
        Self::MissingVariable { name }
    }

    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidVariable {
            name,
            message: message.into(),
        }
    }
}

/// Application configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string. Required.
    pub database_url: String,
    /// Token signing secret. Required.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration_secs: i64,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// CORS allow-list; `None` means permissive, like the original server.
    pub allowed_origins: Option<Vec<String>>,
    /// Directory uploaded images are written to and served from.
    pub upload_dir: PathBuf,
    /// Connection pool capacity; caps concurrent in-flight store calls.
    pub db_pool_size: u32,
    /// Policy: accept `user_id` form-field authorship without a token.
    pub open_posting: bool,
    /// Policy: auto-create placeholder users for anonymous like actors.
    pub anonymous_likes: bool,
}

const DEFAULT_PORT: u16 = 5005;
const DEFAULT_JWT_EXPIRATION_SECS: i64 = 86_400;
const DEFAULT_POOL_SIZE: u32 = 10;

fn parse_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::invalid(
                name,
                format!("expected a boolean, got {other:?}"),
            )),
        },
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::missing("DATABASE_URL"))?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::invalid("JWT_SECRET", "must not be empty"));
        }

        let jwt_expiration_secs = match env::var("JWT_EXPIRATION") {
            Err(_) => DEFAULT_JWT_EXPIRATION_SECS,
            Ok(value) => value.trim().parse::<i64>().map_err(|err| {
                ConfigError::invalid("JWT_EXPIRATION", format!("expected seconds: {err}"))
            })?,
        };

        let port = match env::var("PORT") {
            Err(_) => DEFAULT_PORT,
            Ok(value) => value.trim().parse::<u16>().map_err(|err| {
                ConfigError::invalid("PORT", format!("expected a port number: {err}"))
            })?,
        };
        let host = match env::var("BIND_ADDR") {
            Err(_) => IpAddr::from([0, 0, 0, 0]),
            Ok(value) => value.trim().parse::<IpAddr>().map_err(|err| {
                ConfigError::invalid("BIND_ADDR", format!("expected an IP address: {err}"))
            })?,
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS").ok().map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        });
        let allowed_origins = match allowed_origins {
            Some(origins) if origins.is_empty() => None,
            other => other,
        };

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let db_pool_size = match env::var("DB_POOL_SIZE") {
            Err(_) => DEFAULT_POOL_SIZE,
            Ok(value) => {
                let parsed = value.trim().parse::<u32>().map_err(|err| {
                    ConfigError::invalid("DB_POOL_SIZE", format!("expected a count: {err}"))
                })?;
                if parsed == 0 {
                    return Err(ConfigError::invalid("DB_POOL_SIZE", "must be at least 1"));
                }
                parsed
            }
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_secs,
            bind_addr: SocketAddr::new(host, port),
            allowed_origins,
            upload_dir,
            db_pool_size,
            open_posting: parse_flag("OPEN_POSTING", false)?,
            anonymous_likes: parse_flag("ANONYMOUS_LIKES", true)?,
        })
    }
}
