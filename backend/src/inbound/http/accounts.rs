//! Account API handlers.
//!
//! ```text
//! POST /api/v1/accounts {"username":"view@test.com","password":"foo"}
//! POST /api/v1/accounts/activate/{key}
//! POST /api/v1/login {"username":"view@test.com","password":"foo"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{
    ActivationKey, Error, LoginCredentials, LoginValidationError, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credentials body shared by registration and login.
///
/// Example JSON:
/// `{"username":"view@test.com","password":"foo"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<CredentialsRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Response to a successful registration.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    /// Key to pass to the activation endpoint.
    pub activation_key: String,
}

/// Response to a successful login.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub is_staff: bool,
}

fn map_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Username(UserValidationError::UsernameTooLong { max }) => {
            Error::invalid_request(format!("username must be at most {max} characters"))
                .with_details(json!({ "field": "username", "code": "username_too_long" }))
        }
        LoginValidationError::Username(_) => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new, inactive account.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = RegistrationResponse),
        (status = 400, description = "Invalid request or duplicate username", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "registerAccount",
    security([])
)]
#[post("/accounts")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_validation_error)?;
    let key = state.accounts.register(&credentials).await?;
    Ok(HttpResponse::Created().json(RegistrationResponse {
        activation_key: key.to_string(),
    }))
}

/// Activate the account an activation key was issued for.
#[utoipa::path(
    post,
    path = "/api/v1/accounts/activate/{key}",
    params(("key" = String, Path, description = "Activation key")),
    responses(
        (status = 204, description = "Account activated"),
        (status = 404, description = "Unknown activation key", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "activateAccount",
    security([])
)]
#[post("/accounts/activate/{key}")]
pub async fn activate(
    state: web::Data<HttpState>,
    key: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let key = ActivationKey::parse(&key)?;
    state.accounts.activate(&key).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account not activated", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_validation_error)?;
    let account = state.accounts.authenticate(&credentials).await?;
    session.persist_user(account.id())?;
    info!(user = %account.id(), "logged in");
    Ok(HttpResponse::Ok().json(LoginResponse {
        id: account.id().to_string(),
        username: account.username().to_string(),
        is_staff: account.is_staff(),
    }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use crate::test_support::harness::{PASSWORD, TestHarness};

    async fn app(
        harness: &TestHarness,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .wrap(test_session_middleware())
                .service(
                    web::scope("/api/v1")
                        .service(register)
                        .service(activate)
                        .service(login)
                        .service(logout),
                ),
        )
        .await
    }

    fn credentials(username: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    #[actix_web::test]
    async fn register_activate_login_round_trip() {
        let harness = TestHarness::new();
        let app = app(&harness).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/accounts")
                .set_json(credentials("view@test.com", PASSWORD))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: RegistrationResponse = actix_test::read_body_json(res).await;

        let login_req = || {
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials("view@test.com", PASSWORD))
                .to_request()
        };
        let res = actix_test::call_service(&app, login_req()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/accounts/activate/{}", body.activation_key))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = actix_test::call_service(&app, login_req()).await;
        assert_eq!(res.status(), StatusCode::OK);
        session_cookie(&res);
        let body: LoginResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.username, "view@test.com");
        assert!(!body.is_staff);
    }

    #[actix_web::test]
    async fn duplicate_registration_is_rejected() {
        let harness = TestHarness::new();
        harness.account("u1", false, &[]).await;
        let app = app(&harness).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/accounts")
                .set_json(credentials("u1", "bar"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case("   ", "foo", "username", "empty_username")]
    #[case("u1", "", "password", "empty_password")]
    #[actix_web::test]
    async fn login_validates_payloads(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let harness = TestHarness::new();
        let app = app(&harness).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials(username, password))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
        assert_eq!(value["details"]["code"], code);
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let harness = TestHarness::new();
        harness.account("u1", false, &[]).await;
        let app = app(&harness).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials("u1", "wrong"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn unknown_activation_key_is_not_found() {
        let harness = TestHarness::new();
        let app = app(&harness).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/accounts/activate/deadbeef")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
