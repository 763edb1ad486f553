//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{BuiltState, build_http_state};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use courseware::Trace;
#[cfg(debug_assertions)]
use courseware::doc::ApiDoc;
use courseware::inbound::http::accounts::{activate, login, logout, register};
use courseware::inbound::http::courses::{
    about_section, enroll, info_section, list_courses, staff_access,
};
use courseware::inbound::http::health::{HealthState, live, ready};
use courseware::inbound::http::state::HttpState;
use courseware::inbound::http::wiki::{course_home, course_page, root_page};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .service(register)
        .service(activate)
        .service(login)
        .service(logout)
        .service(list_courses)
        .service(about_section)
        .service(info_section)
        .service(enroll)
        .service(staff_access);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(root_page)
        .service(course_page)
        .service(course_home)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.wrap(session).wrap(Trace)
}

/// Build the application state and an Actix HTTP server for it.
///
/// Readiness is marked once the content store is loaded and the socket is
/// bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the content root or account seed cannot
/// be read, or when binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let BuiltState {
        http_state,
        course_count,
    } = build_http_state(&config).await?;
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready(course_count);
    Ok(server)
}
