//! Caller identity extraction.
//!
//! Every per-user operation receives its caller from the `X-User-Id`
//! header, populated by the upstream authentication collaborator. This core
//! trusts that identity once it parses; the extractor keeps handlers free
//! of header plumbing.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::domain::{Error, UserId};

/// Header carrying the resolved caller identity.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Identity(UserId);

impl Identity {
    /// Construct an identity from an already-validated user id.
    pub fn new(user_id: UserId) -> Self {
        Self(user_id)
    }

    /// Borrow the caller's user id.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    /// Consume the extractor, yielding the caller's user id.
    pub fn into_user_id(self) -> UserId {
        self.0
    }
}

fn identity_from_request(req: &HttpRequest) -> Result<Identity, Error> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| Error::unauthorized(format!("missing {USER_ID_HEADER} header")))?
        .to_str()
        .map_err(|_| Error::unauthorized(format!("{USER_ID_HEADER} header is not valid text")))?;

    let user_id = UserId::new(raw)
        .map_err(|_| Error::unauthorized(format!("{USER_ID_HEADER} header is not a valid id")))?;

    Ok(Identity(user_id))
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity_from_request(req))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use super::*;
    use crate::domain::ApiResult;

    async fn whoami(identity: Identity) -> ApiResult<HttpResponse> {
        Ok(HttpResponse::Ok().body(identity.into_user_id().to_string()))
    }

    fn app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().route("/whoami", web::get().to(whoami))
    }

    #[actix_web::test]
    async fn header_identity_is_extracted() {
        let app = test::init_service(app()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header((USER_ID_HEADER, "3fa85f64-5717-4562-b3fc-2c963f66afa6"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = test::read_body(response).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorised() {
        let app = test::init_service(app()).await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_header_is_unauthorised() {
        let app = test::init_service(app()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header((USER_ID_HEADER, "not-a-uuid"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
