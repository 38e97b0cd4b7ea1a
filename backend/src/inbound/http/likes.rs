//! Like and unlike handlers.
//!
//! ```text
//! POST /posts/{id}/like {"user_id":"..."}
//! POST /posts/{id}/unlike {"user_id":"..."}
//! ```
//!
//! Like actors identify themselves in the body rather than via a token:
//! anonymous visitors mint a UUID client-side, and the ledger policy decides
//! whether to materialise them as placeholder users.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, PostId, UserId};

use super::ApiResult;
use super::state::HttpState;

/// Request body for like and unlike.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LikeRequest {
    pub user_id: Uuid,
}

/// Response body for a successful like.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    pub message: String,
    pub total_likes: i64,
}

/// Response body for a successful unlike.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnlikeResponse {
    pub message: String,
}

/// Like a post.
#[utoipa::path(
    post,
    path = "/posts/{id}/like",
    request_body = LikeRequest,
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 201, description = "Post liked", body = LikeResponse),
        (status = 400, description = "Already liked or invalid actor", body = Error),
        (status = 404, description = "Unknown post", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["likes"],
    operation_id = "likePost",
    security([])
)]
#[post("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<LikeRequest>,
) -> ApiResult<HttpResponse> {
    let post = PostId::from_uuid(path.into_inner());
    let actor = UserId::from_uuid(payload.user_id);
    let total_likes = state.likes.like(&post, &actor).await?;
    Ok(HttpResponse::Created().json(LikeResponse {
        message: "post liked successfully".to_owned(),
        total_likes,
    }))
}

/// Remove a like from a post.
#[utoipa::path(
    post,
    path = "/posts/{id}/unlike",
    request_body = LikeRequest,
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post unliked", body = UnlikeResponse),
        (status = 404, description = "Like not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["likes"],
    operation_id = "unlikePost",
    security([])
)]
#[post("/posts/{id}/unlike")]
pub async fn unlike_post(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<LikeRequest>,
) -> ApiResult<HttpResponse> {
    let post = PostId::from_uuid(path.into_inner());
    let actor = UserId::from_uuid(payload.user_id);
    state.likes.unlike(&post, &actor).await?;
    Ok(HttpResponse::Ok().json(UnlikeResponse {
        message: "post unliked successfully".to_owned(),
    }))
}
