//! Registration and login handlers.
//!
//! ```text
//! POST /register {"username":"alice","email":"a@x.com","password":"pw"}
//! POST /login {"email":"a@x.com","password":"pw"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthValidationError, EmailAddress, Error, LoginCredentials, NewRegistration, User, UserId,
    Username,
};

use super::ApiResult;
use super::state::HttpState;

/// Registration request body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Public view of a user, safe for client responses (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            username: user.username().clone(),
            email: user.email().clone(),
        }
    }
}

/// Response body for a successful registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        NewRegistration::try_from_parts(&payload.username, &payload.email, &payload.password)
            .map_err(map_auth_validation_error)?;
    let user = state.accounts.register(&registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "user registered successfully".to_owned(),
        user: UserSummary::from(&user),
    }))
}

/// Authenticate and receive a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid password", body = Error),
        (status = 404, description = "Unknown email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_auth_validation_error)?;
    let session = state.accounts.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        token: session.token.into_string(),
        user: UserSummary::from(&session.user),
    }))
}
