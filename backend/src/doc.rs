//! OpenAPI documentation.
//!
//! [`ApiDoc`] collects every handler path and the payload schemas. Swagger UI
//! serves it in debug builds, and `openapi-dump` prints it for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{CredentialsRequest, LoginResponse, RegistrationResponse};
use crate::inbound::http::courses::{CourseSummary, SectionResponse, StaffAccessResponse};
use crate::inbound::http::health::ProbeReport;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the courseware service.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Courseware API",
        description = "Course catalogue, course pages, enrolment and wiki navigation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::activate,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::about_section,
        crate::inbound::http::courses::info_section,
        crate::inbound::http::courses::enroll,
        crate::inbound::http::courses::staff_access,
        crate::inbound::http::wiki::root_page,
        crate::inbound::http::wiki::course_page,
        crate::inbound::http::wiki::course_home,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CredentialsRequest,
        RegistrationResponse,
        LoginResponse,
        CourseSummary,
        SectionResponse,
        StaffAccessResponse,
        ProbeReport,
    )),
    tags(
        (name = "accounts", description = "Registration and sessions"),
        (name = "courses", description = "Catalogue, course pages and enrolment"),
        (name = "wiki", description = "Root and course wiki pages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/v1/courses")]
    #[case("/api/v1/courses/{org}/{number}/{run}/about/{section}")]
    #[case("/api/v1/courses/{org}/{number}/{run}/info/{section}")]
    #[case("/api/v1/login")]
    #[case("/wiki/{path}")]
    #[case("/courses/{org}/{number}/{run}/course_wiki")]
    #[case("/health/ready")]
    fn documents_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
