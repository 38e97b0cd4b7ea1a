//! PostgreSQL persistence adapters built on Diesel and diesel-async.

mod diesel_like_ledger;
mod diesel_post_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;
#[cfg(test)]
pub(crate) mod test_support;

pub use self::diesel_like_ledger::DieselLikeLedger;
pub use self::diesel_post_repository::DieselPostRepository;
pub use self::diesel_user_repository::DieselUserRepository;
pub use self::pool::{DbPool, PoolConfig, PoolError};
