//! Blogging backend library.
//!
//! A small blog server: registration and login, authenticated post creation
//! with optional image attachment, and an idempotent like/unlike ledger over
//! PostgreSQL. Laid out hexagonally:
//!
//! - [`domain`] — entities, validation, services, and port traits.
//! - [`inbound`] — the Actix Web REST adapter.
//! - [`outbound`] — Diesel persistence, Argon2 hashing, JWT signing, and
//!   filesystem image storage.
//! - [`server`] — configuration and composition root.
//!
//! The like ledger is the load-bearing piece: uniqueness of
//! (post, actor) pairs is enforced by a database constraint, never by
//! check-then-insert application code, so concurrent duplicate requests
//! cannot both land.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-tracing middleware attaching `Trace-Id` headers.
pub use middleware::Trace;
