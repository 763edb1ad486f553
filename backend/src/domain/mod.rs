//! Domain primitives, services and ports.
//!
//! Purpose: hold the course-content rules (course resolution, section
//! loading, staff access, catalogue grouping and wiki navigation) free of any
//! transport or storage concerns. Adapters talk to the domain through the
//! traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Course / CourseId: course metadata and its `org/number/run` identifier.
//! - CourseResolver, SectionContentLoader, CourseCatalog, WikiNavigator:
//!   read-side services.
//! - AccountService, EnrollmentService: account lifecycle and enrolment.
//! - has_staff_access: per-course staff decision.

pub mod access;
pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod course;
pub mod course_resolver;
pub mod enrollment;
pub mod error;
pub mod flags;
pub mod ports;
pub mod section;
pub mod section_content;
pub mod static_assets;
pub mod trace_id;
pub mod user;
pub mod wiki;

pub use self::access::{Capabilities, GroupName, StaffGroup, Viewer, has_staff_access};
pub use self::accounts::{AccountService, ActivationKey, password_digest};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::catalog::{CourseCatalog, CoursesByOrganization};
pub use self::course::{COURSES_PREFIX, Course, CourseId, CourseIdError};
pub use self::course_resolver::{CourseRequirement, CourseResolver};
pub use self::enrollment::EnrollmentService;
pub use self::error::{Error, ErrorCode};
pub use self::flags::FeatureFlags;
pub use self::section::{AboutSection, InfoSection, SectionContext, SectionKeyError};
pub use self::section_content::{INFO_SECTION_MISSING, SectionContentLoader, SectionError};
pub use self::static_assets::{STATIC_PREFIX, StaticAssets};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Account, USERNAME_MAX, UserId, UserValidationError, Username};
pub use self::wiki::{
    WIKI_ROOT, WikiArticle, WikiNavigator, WikiOutcome, WikiPage, WikiPath, course_wiki_url,
    root_wiki_url,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use courseware::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
