//! Server construction: adapter wiring, middleware, and route registration.

pub mod config;

pub use config::{AppConfig, ConfigError};

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::ports::TokenService;
use crate::domain::{
    AccountService, AnonymousLikerPolicy, Error, LikeService, PostService,
};
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::likes::{like_post, unlike_post};
use crate::inbound::http::posts::{create_post, list_posts};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, register};
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DbPool, DieselLikeLedger, DieselPostRepository, DieselUserRepository, PoolConfig,
};
use crate::outbound::security::Argon2PasswordHasher;
use crate::outbound::storage::{FilesystemImageStore, UPLOADS_PREFIX};
use crate::outbound::token::JwtTokenService;

/// Migrations bundled into the binary and applied before the server binds.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("connect for migrations: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("run migrations: {err}")))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}

/// Wire the adapters and domain services into handler state.
fn build_state(config: &AppConfig, pool: DbPool) -> std::io::Result<web::Data<HttpState>> {
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        &config.jwt_secret,
        config.jwt_expiration_secs,
    ));
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let accounts = AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        tokens.clone(),
    );

    let images = FilesystemImageStore::new(config.upload_dir.clone())
        .map_err(|err| std::io::Error::other(format!("prepare upload dir: {err}")))?;
    let posts = PostService::new(
        Arc::new(DieselPostRepository::new(pool.clone())),
        Arc::new(images),
    );

    let policy = if config.anonymous_likes {
        AnonymousLikerPolicy::AutoCreate
    } else {
        AnonymousLikerPolicy::RegisteredOnly
    };
    let likes = LikeService::new(Arc::new(DieselLikeLedger::new(pool)), users, policy);

    Ok(web::Data::new(HttpState::new(
        accounts,
        posts,
        likes,
        tokens,
        config.open_posting,
    )))
}

fn build_cors(origins: Option<&[String]>) -> Cors {
    match origins {
        // The original deployment ran with a wide-open CORS layer.
        None => Cors::permissive(),
        Some(list) => {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);
            for origin in list {
                cors = cors.allowed_origin(origin);
            }
            cors
        }
    }
}

/// JSON extractor configuration mapping deserialisation failures onto the
/// standard error envelope instead of Actix's default body.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| Error::invalid_request(format!("invalid JSON body: {err}")).into())
}

/// Run migrations, build the pool and state, and serve until shutdown.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    run_migrations(&config.database_url)?;

    let pool = DbPool::new(
        PoolConfig::new(&config.database_url).with_max_size(config.db_pool_size),
    )
    .await
    .map_err(|err| std::io::Error::other(format!("build connection pool: {err}")))?;

    let state = build_state(&config, pool)?;
    let upload_dir = config.upload_dir.clone();
    let allowed_origins = config.allowed_origins.clone();

    info!(addr = %config.bind_addr, "starting http server");
    HttpServer::new(move || {
        let app = App::new()
            .wrap(build_cors(allowed_origins.as_deref()))
            .wrap(Trace)
            .app_data(state.clone())
            .app_data(json_config())
            .service(register)
            .service(login)
            .service(list_posts)
            .service(create_post)
            .service(like_post)
            .service(unlike_post)
            .service(Files::new(UPLOADS_PREFIX, upload_dir.clone()));
        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
        app
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
