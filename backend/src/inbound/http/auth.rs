//! Bearer-token authentication for HTTP handlers.
//!
//! The extractor resolves `Authorization: Bearer <token>` through the token
//! service port and exposes the verified subject to handlers. A missing
//! header and a bad or expired token are both 401s, with distinct messages
//! so clients can tell re-login from retry.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, UserId};

use super::state::HttpState;

/// The verified identity behind a request's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedActor {
    user_id: UserId,
}

impl AuthenticatedActor {
    /// The authenticated subject.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedActor, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    let token = bearer_token(req)?;
    let claims = state.tokens.verify(token).map_err(|err| {
        debug!(error = %err, "token verification failed");
        Error::unauthorized("invalid or expired token")
    })?;
    Ok(AuthenticatedActor {
        user_id: claims.subject(),
    })
}

impl FromRequest for AuthenticatedActor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{issue_token, test_state};
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    async fn call_whoami(authorization: Option<String>) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new().app_data(test_state(false)).route(
                "/whoami",
                web::get().to(|actor: AuthenticatedActor| async move {
                    HttpResponse::Ok().body(actor.user_id().to_string())
                }),
            ),
        )
        .await;
        let mut req = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = authorization {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        actix_test::call_service(&app, req.to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_token_resolves_the_subject() {
        let subject = UserId::random();
        let token = issue_token(&subject);
        let res = call_whoami(Some(format!("Bearer {token}"))).await;
        assert!(res.status().is_success());
        let body = actix_test::read_body(res).await;
        assert_eq!(body, subject.to_string().as_bytes());
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let res = call_whoami(None).await;
        assert_eq!(res.status().as_u16(), 401);
    }

    #[rstest]
    #[actix_web::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let res = call_whoami(Some("Basic YWxhZGRpbg==".to_owned())).await;
        assert_eq!(res.status().as_u16(), 401);
    }

    #[rstest]
    #[actix_web::test]
    async fn garbage_token_is_unauthorized() {
        let res = call_whoami(Some("Bearer not.a.token".to_owned())).await;
        assert_eq!(res.status().as_u16(), 401);
    }

    #[rstest]
    fn bearer_errors_carry_the_unauthorized_code() {
        let req = actix_test::TestRequest::get().to_http_request();
        let err = bearer_token(&req).expect_err("no header present");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
