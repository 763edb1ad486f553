//! Shared helpers for the courseware HTTP suites.
//!
//! Integration tests compile as separate crates, so each suite pulls this
//! module in with `mod support;`.

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};

use courseware::Trace;
use courseware::inbound::http::accounts::{CredentialsRequest, activate, login, logout, register};
use courseware::inbound::http::courses::{
    about_section, enroll, info_section, list_courses, staff_access,
};
use courseware::inbound::http::state::HttpState;
use courseware::inbound::http::test_utils::{session_cookie, test_session_middleware};
use courseware::inbound::http::wiki::{course_home, course_page, root_page};
use courseware::test_support::harness::PASSWORD;

/// Initialised application under test.
pub trait TestApp:
    Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

impl<S> TestApp for S where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

/// Every route, wired the way the server wires them.
pub async fn init_app(state: HttpState) -> impl TestApp {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(
                web::scope("/api/v1")
                    .service(register)
                    .service(activate)
                    .service(login)
                    .service(logout)
                    .service(list_courses)
                    .service(about_section)
                    .service(info_section)
                    .service(enroll)
                    .service(staff_access),
            )
            .service(root_page)
            .service(course_page)
            .service(course_home)
            .wrap(test_session_middleware())
            .wrap(Trace),
    )
    .await
}

/// Log in as `username` with the harness password and return the session
/// cookie.
pub async fn login_as(app: &impl TestApp, username: &str) -> Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(CredentialsRequest {
                username: username.to_owned(),
                password: PASSWORD.to_owned(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login as {username}");
    session_cookie(&res)
}

/// Options for a `GET` request.
#[derive(Default)]
pub struct Get<'a> {
    pub cookie: Option<&'a Cookie<'static>>,
    pub referer: Option<&'a str>,
}

/// Issue a `GET` for `uri`.
pub async fn get(app: &impl TestApp, uri: &str, options: Get<'_>) -> ServiceResponse {
    let mut req = actix_test::TestRequest::get().uri(uri);
    if let Some(cookie) = options.cookie {
        req = req.cookie(cookie.clone());
    }
    if let Some(referer) = options.referer {
        req = req.insert_header((header::REFERER, referer));
    }
    actix_test::call_service(app, req.to_request()).await
}

/// `Location` header of a redirect.
pub fn location(res: &ServiceResponse) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_else(|| panic!("no Location header on {}", res.status()))
}
