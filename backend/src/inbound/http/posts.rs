//! Post listing and creation handlers.
//!
//! ```text
//! GET /posts
//! POST /posts  (multipart: title, content, optional image)
//! ```
//!
//! Creation is auth-gated by default; the `open_posting` policy switch lets
//! a deployment fall back to the original unauthenticated behaviour where
//! the author arrives as a `user_id` form field.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use futures_util::StreamExt as _;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Error, ImageRef, ImageUpload, PostDraft, PostId, PostSummary, PostValidationError, UserId,
    Username,
};

use super::ApiResult;
use super::auth::AuthenticatedActor;
use super::state::HttpState;

/// Upper bound for an uploaded image.
const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;
/// Upper bound for any text part of the form.
const TEXT_FIELD_MAX_BYTES: usize = 64 * 1024;

/// One post as returned by `GET /posts`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostSummaryDto {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub image_path: Option<ImageRef>,
    pub created_at: DateTime<Utc>,
    pub publisher_name: Username,
    pub total_likes: i64,
}

impl From<PostSummary> for PostSummaryDto {
    fn from(summary: PostSummary) -> Self {
        Self {
            id: summary.post.id,
            title: summary.post.title,
            content: summary.post.content,
            author_id: summary.post.author_id,
            image_path: summary.post.image_path,
            created_at: summary.post.created_at,
            publisher_name: summary.publisher_name,
            total_likes: summary.total_likes,
        }
    }
}

/// Response body for `GET /posts`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostsResponse {
    pub result: Vec<PostSummaryDto>,
}

/// Response body for a successful post creation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePostResponse {
    pub message: String,
    #[serde(rename = "postId")]
    pub post_id: PostId,
}

/// List all posts, newest first, with live like counts.
#[utoipa::path(
    get,
    path = "/posts",
    responses(
        (status = 200, description = "Posts", body = PostsResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<web::Json<PostsResponse>> {
    let summaries = state.posts.list().await?;
    Ok(web::Json(PostsResponse {
        result: summaries.into_iter().map(PostSummaryDto::from).collect(),
    }))
}

#[derive(Default)]
struct PostForm {
    title: Option<String>,
    content: Option<String>,
    user_id: Option<Uuid>,
    image: Option<ImageUpload>,
}

fn map_multipart_error(err: actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart payload: {err}"))
}

fn map_post_validation_error(err: PostValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

async fn read_field_bytes(field: &mut Field, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(map_multipart_error)?;
        if bytes.len() + chunk.len() > limit {
            return Err(Error::invalid_request("uploaded part is too large"));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text_field(field: &mut Field) -> Result<String, Error> {
    let bytes = read_field_bytes(field, TEXT_FIELD_MAX_BYTES).await?;
    String::from_utf8(bytes).map_err(|_| Error::invalid_request("form field must be UTF-8"))
}

async fn read_post_form(mut payload: Multipart) -> Result<PostForm, Error> {
    let mut form = PostForm::default();
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(map_multipart_error)?;
        let (name, filename) = {
            let disposition = field.content_disposition();
            (
                disposition.get_name().map(ToOwned::to_owned),
                disposition.get_filename().map(ToOwned::to_owned),
            )
        };
        match name.as_deref() {
            Some("title") => form.title = Some(read_text_field(&mut field).await?),
            Some("content") => form.content = Some(read_text_field(&mut field).await?),
            Some("user_id") => {
                let raw = read_text_field(&mut field).await?;
                let parsed = Uuid::parse_str(raw.trim())
                    .map_err(|_| Error::invalid_request("user_id must be a UUID"))?;
                form.user_id = Some(parsed);
            }
            Some("image") => {
                let bytes = read_field_bytes(&mut field, IMAGE_MAX_BYTES).await?;
                // Browsers submit an empty part when no file was chosen.
                if !bytes.is_empty() {
                    form.image = Some(ImageUpload {
                        filename: filename.unwrap_or_default(),
                        bytes,
                    });
                }
            }
            _ => {
                // Unknown parts must still be drained so the stream can
                // advance to the next field.
                read_field_bytes(&mut field, IMAGE_MAX_BYTES).await?;
            }
        }
    }
    Ok(form)
}

/// Resolve the post author from the bearer token, or, under the
/// `open_posting` policy, from the `user_id` form field.
fn resolve_author(
    state: &HttpState,
    auth: Result<AuthenticatedActor, Error>,
    form: &PostForm,
) -> Result<UserId, Error> {
    match auth {
        Ok(actor) => Ok(actor.user_id()),
        Err(err) => {
            if state.open_posting {
                form.user_id
                    .map(UserId::from_uuid)
                    .ok_or_else(|| Error::invalid_request("user_id is required"))
            } else {
                Err(err)
            }
        }
    }
}

/// Create a post with an optional image attachment.
#[utoipa::path(
    post,
    path = "/posts",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Post created", body = CreatePostResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    auth: Result<AuthenticatedActor, Error>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let form = read_post_form(payload).await?;
    let author = resolve_author(&state, auth, &form)?;
    let draft = PostDraft::try_from_parts(
        form.title.as_deref().unwrap_or_default(),
        form.content.as_deref().unwrap_or_default(),
    )
    .map_err(map_post_validation_error)?;

    let post = state.posts.create(author, draft, form.image).await?;
    Ok(HttpResponse::Created().json(CreatePostResponse {
        message: "the post was created successfully".to_owned(),
        post_id: post.id,
    }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for post endpoints, including multipart parsing.
    use std::sync::Arc;

    use super::*;
    use crate::inbound::http::test_utils::{
        InMemoryBlog, issue_token, seed_user, test_state_with,
    };
    use actix_web::http::header;
    use actix_web::{App, test};
    use rstest::rstest;

    const BOUNDARY: &str = "----blogtestboundary";

    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(fname) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{fname}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn content_type() -> (header::HeaderName, String) {
        (
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
    }

    fn app(
        blog: Arc<InMemoryBlog>,
        open_posting: bool,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(test_state_with(blog, open_posting))
            .service(list_posts)
            .service(create_post)
    }

    #[rstest]
    #[actix_web::test]
    async fn authenticated_create_then_list_round_trips() {
        let blog = Arc::new(InMemoryBlog::default());
        let author = seed_user(&blog, "alice", "a@x.com").await;
        let app = test::init_service(app(blog, false)).await;

        let body = multipart_body(&[
            ("title", None, b"Hello"),
            ("content", None, b"First post"),
        ]);
        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", issue_token(&author))))
            .insert_header(content_type())
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 201);
        let created: CreatePostResponse = test::read_body_json(res).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request())
            .await;
        assert_eq!(res.status().as_u16(), 200);
        let listing: PostsResponse = test::read_body_json(res).await;
        assert_eq!(listing.result.len(), 1);
        let summary = &listing.result[0];
        assert_eq!(summary.id, created.post_id);
        assert_eq!(summary.title, "Hello");
        assert_eq!(summary.publisher_name.as_str(), "alice");
        assert_eq!(summary.total_likes, 0);
        assert!(summary.image_path.is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn image_parts_are_stored_and_referenced() {
        let blog = Arc::new(InMemoryBlog::default());
        let author = seed_user(&blog, "alice", "a@x.com").await;
        let app = test::init_service(app(blog, false)).await;

        let body = multipart_body(&[
            ("title", None, b"With image"),
            ("content", None, b"Body"),
            ("image", Some("cat.png"), b"fake image bytes"),
        ]);
        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", issue_token(&author))))
            .insert_header(content_type())
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 201);

        let res = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request())
            .await;
        let listing: PostsResponse = test::read_body_json(res).await;
        assert_eq!(
            listing.result[0].image_path.as_ref().map(ImageRef::as_str),
            Some("/uploads/mem-cat.png")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_token_is_unauthorized_by_default() {
        let blog = Arc::new(InMemoryBlog::default());
        let app = test::init_service(app(blog, false)).await;

        let body = multipart_body(&[("title", None, b"Hello"), ("content", None, b"Body")]);
        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(content_type())
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 401);
    }

    #[rstest]
    #[actix_web::test]
    async fn open_posting_accepts_a_user_id_field() {
        let blog = Arc::new(InMemoryBlog::default());
        let author = seed_user(&blog, "alice", "a@x.com").await;
        let app = test::init_service(app(blog, true)).await;

        let author_field = author.to_string();
        let body = multipart_body(&[
            ("title", None, b"Hello"),
            ("content", None, b"Body"),
            ("user_id", None, author_field.as_bytes()),
        ]);
        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(content_type())
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 201);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_title_is_invalid() {
        let blog = Arc::new(InMemoryBlog::default());
        let author = seed_user(&blog, "alice", "a@x.com").await;
        let app = test::init_service(app(blog, false)).await;

        let body = multipart_body(&[("content", None, b"Body")]);
        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", issue_token(&author))))
            .insert_header(content_type())
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 400);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_author_is_invalid() {
        let blog = Arc::new(InMemoryBlog::default());
        let app = test::init_service(app(blog, false)).await;

        let stranger = UserId::random();
        let body = multipart_body(&[("title", None, b"Hello"), ("content", None, b"Body")]);
        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", issue_token(&stranger)),
            ))
            .insert_header(content_type())
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 400);
    }
}
