//! Backend entry-point: loads configuration and serves the REST API.

use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::server::{self, AppConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    // Refuse to start without a signing secret or database: a server that
    // issues forgeable tokens or has no store is worse than one that exits.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "configuration error");
            return Err(std::io::Error::other(format!("configuration error: {err}")));
        }
    };

    server::run(config).await
}
