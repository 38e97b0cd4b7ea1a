//! Like/unlike orchestration: idempotent likes with race-safe counting.
//!
//! The service deliberately performs no duplicate pre-check. Uniqueness is
//! enforced by the ledger's storage constraint at insert time, which is the
//! only place a check-then-insert race between concurrent handlers can be
//! closed. The returned count is always recomputed from ledger rows.

use std::sync::Arc;

use tracing::{debug, error};

use super::account_service::map_user_persistence_error;
use super::error::Error;
use super::ports::{LikeLedger, LikeLedgerError, UserRepository};
use super::post::PostId;
use super::user::{NewUserRecord, UserId};

/// Who may act as a like actor.
///
/// The original deployment accepted likes from visitors who never registered,
/// minting their identity client-side. That behaviour is kept as an explicit
/// policy rather than an accident of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousLikerPolicy {
    /// Unknown actors get a placeholder user row created on first like.
    AutoCreate,
    /// Only registered users may like; unknown actors are rejected.
    RegisteredOnly,
}

/// Like ledger service.
#[derive(Clone)]
pub struct LikeService {
    ledger: Arc<dyn LikeLedger>,
    users: Arc<dyn UserRepository>,
    policy: AnonymousLikerPolicy,
}

impl LikeService {
    /// Create a new service over the given ports.
    pub fn new(
        ledger: Arc<dyn LikeLedger>,
        users: Arc<dyn UserRepository>,
        policy: AnonymousLikerPolicy,
    ) -> Self {
        Self {
            ledger,
            users,
            policy,
        }
    }

    /// Record a like and return the post's live like count.
    ///
    /// A duplicate like fails with `AlreadyLiked` and leaves the ledger
    /// unchanged; an unknown post fails with `NotFound`.
    pub async fn like(&self, post: &PostId, actor: &UserId) -> Result<i64, Error> {
        match self.policy {
            AnonymousLikerPolicy::AutoCreate => {
                let record = NewUserRecord::placeholder(*actor)
                    .map_err(|err| Error::internal(format!("invalid placeholder record: {err}")))?;
                self.users
                    .ensure_placeholder(&record)
                    .await
                    .map_err(map_user_persistence_error)?;
            }
            AnonymousLikerPolicy::RegisteredOnly => {
                let known = self
                    .users
                    .find_by_id(actor)
                    .await
                    .map_err(map_user_persistence_error)?
                    .is_some();
                if !known {
                    return Err(Error::invalid_request("unknown like actor"));
                }
            }
        }

        match self.ledger.insert(post, actor).await {
            Ok(()) => {}
            Err(LikeLedgerError::Duplicate) => {
                debug!(%post, %actor, "duplicate like rejected by ledger constraint");
                return Err(Error::already_liked("you have already liked this post"));
            }
            Err(LikeLedgerError::MissingPost) => {
                return Err(Error::not_found("post not found"));
            }
            Err(LikeLedgerError::MissingActor) => {
                return Err(Error::invalid_request("unknown like actor"));
            }
            Err(other) => return Err(map_ledger_error(other)),
        }

        self.ledger.count(post).await.map_err(map_ledger_error)
    }

    /// Remove a like; absent likes are reported, not silently swallowed.
    pub async fn unlike(&self, post: &PostId, actor: &UserId) -> Result<(), Error> {
        let removed = self
            .ledger
            .remove(post, actor)
            .await
            .map_err(map_ledger_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found("like not found"))
        }
    }

    /// Live like count for a post.
    pub async fn count(&self, post: &PostId) -> Result<i64, Error> {
        self.ledger.count(post).await.map_err(map_ledger_error)
    }
}

fn map_ledger_error(error: LikeLedgerError) -> Error {
    match error {
        LikeLedgerError::Duplicate => Error::already_liked("you have already liked this post"),
        LikeLedgerError::MissingPost => Error::not_found("post not found"),
        LikeLedgerError::MissingActor => Error::invalid_request("unknown like actor"),
        LikeLedgerError::Connection { .. } | LikeLedgerError::Query { .. } => {
            error!(%error, "like ledger failure");
            Error::internal("like ledger unavailable")
        }
    }
}
