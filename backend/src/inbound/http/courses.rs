//! Course API handlers.
//!
//! ```text
//! GET  /api/v1/courses
//! GET  /api/v1/courses/{org}/{number}/{run}/about/{section}
//! GET  /api/v1/courses/{org}/{number}/{run}/info/{section}
//! POST /api/v1/courses/{org}/{number}/{run}/enrollment
//! GET  /api/v1/courses/{org}/{number}/{run}/staff-access
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Course, Error, StaticAssets, has_staff_access};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{current_viewer, require_account};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Course identifier segments taken from the URL.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Path)]
pub struct CoursePath {
    /// Organisation, e.g. `edX`.
    pub org: String,
    /// Course number, e.g. `toy`.
    pub number: String,
    /// Run, e.g. `2012_Fall`.
    pub run: String,
}

impl CoursePath {
    /// Raw `org/number/run` identifier, validated when resolved.
    #[must_use]
    pub fn raw_id(&self) -> String {
        format!("{}/{}/{}", self.org, self.number, self.run)
    }
}

/// Course and section segments taken from the URL.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Path)]
pub struct SectionPath {
    pub org: String,
    pub number: String,
    pub run: String,
    /// Section key, e.g. `overview` or `handouts`.
    pub section: String,
}

impl SectionPath {
    fn raw_id(&self) -> String {
        format!("{}/{}/{}", self.org, self.number, self.run)
    }
}

/// Catalogue entry for one course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    #[schema(example = "edX/toy/2012_Fall")]
    pub id: String,
    pub org: String,
    pub number: String,
    pub run: String,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    #[schema(example = "/static/toy/images/course_image.jpg")]
    pub image_url: String,
}

impl CourseSummary {
    fn new(course: &Course, assets: &StaticAssets) -> Self {
        Self {
            id: course.id().to_string(),
            org: course.org().to_owned(),
            number: course.number().to_owned(),
            run: course.id().run().to_owned(),
            title: course.title().to_owned(),
            start: course.start(),
            image_url: assets.course_image_url(course),
        }
    }
}

/// Rendered section fragment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    /// Section key as requested.
    pub section: String,
    /// HTML with static URLs scoped to the course; `null` for an absent
    /// about section.
    pub html: Option<String>,
}

/// Whether the viewer has staff access to a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffAccessResponse {
    pub staff: bool,
}

/// List courses grouped by organisation.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Courses keyed by organisation",
            body = BTreeMap<String, Vec<CourseSummary>>),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["courses"],
    operation_id = "listCourses",
    security([])
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<BTreeMap<String, Vec<CourseSummary>>>> {
    let viewer = current_viewer(&state, &session).await?;
    let grouped = state.catalog.courses_by_organization(Some(&viewer)).await?;
    let body = grouped
        .into_iter()
        .map(|(org, courses)| {
            let summaries = courses
                .iter()
                .map(|course| CourseSummary::new(course, &state.assets))
                .collect();
            (org, summaries)
        })
        .collect();
    Ok(web::Json(body))
}

/// Load an about-page section. Courses need not have started.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{org}/{number}/{run}/about/{section}",
    params(SectionPath),
    responses(
        (status = 200, description = "Section HTML, null when absent", body = SectionResponse),
        (status = 400, description = "Unknown section key", body = Error),
        (status = 404, description = "Unknown course", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["courses"],
    operation_id = "getAboutSection",
    security([])
)]
#[get("/courses/{org}/{number}/{run}/about/{section}")]
pub async fn about_section(
    state: web::Data<HttpState>,
    path: web::Path<SectionPath>,
) -> ApiResult<web::Json<SectionResponse>> {
    let course = state.resolver.resolve_any(&path.raw_id()).await?;
    let html = state
        .sections
        .load_about_section(&course, &path.section)
        .await?;
    Ok(web::Json(SectionResponse {
        section: path.into_inner().section,
        html,
    }))
}

/// Load an info-page section. The course must have started.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{org}/{number}/{run}/info/{section}",
    params(SectionPath),
    responses(
        (status = 200, description = "Section HTML", body = SectionResponse),
        (status = 400, description = "Unknown section key", body = Error),
        (status = 404, description = "Unknown or unopened course", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["courses"],
    operation_id = "getInfoSection",
    security([])
)]
#[get("/courses/{org}/{number}/{run}/info/{section}")]
pub async fn info_section(
    state: web::Data<HttpState>,
    path: web::Path<SectionPath>,
) -> ApiResult<web::Json<SectionResponse>> {
    let course = state.resolver.require(&path.raw_id()).await?;
    let html = state
        .sections
        .load_info_section(&course, &path.section)
        .await?;
    Ok(web::Json(SectionResponse {
        section: path.into_inner().section,
        html: Some(html),
    }))
}

/// Enrol the logged-in account in a course.
#[utoipa::path(
    post,
    path = "/api/v1/courses/{org}/{number}/{run}/enrollment",
    params(CoursePath),
    responses(
        (status = 204, description = "Enrolled"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown course", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["courses"],
    operation_id = "enroll"
)]
#[post("/courses/{org}/{number}/{run}/enrollment")]
pub async fn enroll(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CoursePath>,
) -> ApiResult<HttpResponse> {
    let account = require_account(&state, &session).await?;
    let course = state.resolver.resolve_any(&path.raw_id()).await?;
    state.enrollments.enroll(&account, &course).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Report whether the current viewer has staff access to a course.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{org}/{number}/{run}/staff-access",
    params(CoursePath),
    responses(
        (status = 200, description = "Staff access decision", body = StaffAccessResponse),
        (status = 404, description = "Unknown course", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["courses"],
    operation_id = "getStaffAccess",
    security([])
)]
#[get("/courses/{org}/{number}/{run}/staff-access")]
pub async fn staff_access(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CoursePath>,
) -> ApiResult<web::Json<StaffAccessResponse>> {
    let course = state.resolver.resolve_any(&path.raw_id()).await?;
    let viewer = current_viewer(&state, &session).await?;
    Ok(web::Json(StaffAccessResponse {
        staff: has_staff_access(Some(&viewer), Some(&course)),
    }))
}
