//! Wiki navigation between the root wiki and course-scoped wikis.
//!
//! The same article can be reached as `/wiki/<path>` or as
//! `/courses/<id>/wiki/<path>`. Requests arriving from a course page are
//! steered into that course's wiki, requests for a course that cannot be
//! loaded fall back to the root wiki, and course wikis are visible only to
//! enrolled students and course staff.

use std::fmt;
use std::sync::Arc;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use tracing::{debug, info};

use super::access::has_staff_access;
use super::ports::{WikiRepository, WikiRepositoryError};
use super::{Course, CourseId, CourseResolver, EnrollmentService, Error, FeatureFlags, Viewer};

/// Root of the site-wide wiki.
pub const WIKI_ROOT: &str = "/wiki/";

/// Normalised article path: `/`-joined segments without surrounding or
/// repeated slashes. The empty path is the wiki root.
///
/// # Examples
/// ```
/// use courseware::domain::WikiPath;
///
/// let path = WikiPath::parse("/some//fake/page/");
/// assert_eq!(path.as_str(), "some/fake/page");
/// assert!(WikiPath::parse("/").is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WikiPath(String);

impl WikiPath {
    /// Normalise a raw URL path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
        Self(segments.join("/"))
    }

    /// Whether this is the wiki root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the normalised path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WikiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wiki article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WikiArticle {
    path: WikiPath,
    title: String,
}

impl WikiArticle {
    /// Build an article.
    pub fn new(path: WikiPath, title: impl Into<String>) -> Self {
        Self {
            path,
            title: title.into(),
        }
    }

    /// Article path.
    #[must_use]
    pub fn path(&self) -> &WikiPath {
        &self.path
    }

    /// Article title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// An article ready to render, with the course it is viewed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPage {
    /// Article to show.
    pub article: WikiArticle,
    /// Course context; `Some` renders the course navigator.
    pub course: Option<Course>,
}

/// Result of a wiki navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiOutcome {
    /// Send the client elsewhere.
    Redirect(String),
    /// Render the page.
    Page(WikiPage),
}

/// Bytes escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode each `/`-separated segment of a decoded article path.
///
/// Handlers receive the path already decoded, so reserved characters that
/// belonged to an article name must be escaped again before the path is
/// placed in a `Location` header.
fn encode_path(raw_path: &str) -> String {
    raw_path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// URL of the decoded `raw_path` inside the root wiki.
///
/// # Examples
/// ```
/// use courseware::domain::root_wiki_url;
///
/// assert_eq!(root_wiki_url("some/page/"), "/wiki/some/page/");
/// assert_eq!(root_wiki_url("a?b/"), "/wiki/a%3Fb/");
/// ```
#[must_use]
pub fn root_wiki_url(raw_path: &str) -> String {
    format!("{WIKI_ROOT}{}", encode_path(raw_path))
}

/// URL of the decoded `raw_path` inside the wiki of course `id`.
#[must_use]
pub fn course_wiki_url(id: &CourseId, raw_path: &str) -> String {
    id.page_url(&format!("wiki/{}", encode_path(raw_path)))
}

fn repository_error(err: WikiRepositoryError) -> Error {
    Error::internal(err.to_string())
}

/// Decides where wiki requests go and who may see them.
#[derive(Clone)]
pub struct WikiNavigator {
    wiki: Arc<dyn WikiRepository>,
    resolver: CourseResolver,
    enrollments: EnrollmentService,
    flags: FeatureFlags,
}

impl WikiNavigator {
    /// Build a navigator.
    pub fn new(
        wiki: Arc<dyn WikiRepository>,
        resolver: CourseResolver,
        enrollments: EnrollmentService,
        flags: FeatureFlags,
    ) -> Self {
        Self {
            wiki,
            resolver,
            enrollments,
            flags,
        }
    }

    /// Handle `/wiki/<raw_path>`.
    ///
    /// Root browsing must be enabled. A referer naming a loadable course
    /// redirects into that course's wiki, keeping the path as requested.
    pub async fn root_page(
        &self,
        viewer: &Viewer,
        raw_path: &str,
        referer: Option<&str>,
    ) -> Result<WikiOutcome, Error> {
        require_login(viewer)?;
        if !self.flags.allow_wiki_root_access {
            debug!(path = raw_path, "root wiki access disabled");
            return Err(Error::forbidden("The wiki is only available inside a course."));
        }
        if let Some(id) = referer.and_then(CourseId::from_url) {
            match self.resolver.require(&id.to_string()).await {
                Ok(_) => {
                    let target = course_wiki_url(&id, raw_path);
                    debug!(course = %id, %target, "redirecting into course wiki");
                    return Ok(WikiOutcome::Redirect(target));
                }
                Err(err) => {
                    debug!(course = %id, error = %err, "referer course not loadable");
                }
            }
        }
        let article = self.find(&WikiPath::parse(raw_path)).await?;
        Ok(WikiOutcome::Page(WikiPage {
            article,
            course: None,
        }))
    }

    /// Handle `/courses/<course_id>/wiki/<raw_path>`.
    ///
    /// A course that cannot be loaded, including a malformed id, sends the
    /// client to the same path in the root wiki.
    pub async fn course_page(
        &self,
        viewer: &Viewer,
        course_id: &str,
        raw_path: &str,
    ) -> Result<WikiOutcome, Error> {
        require_login(viewer)?;
        let course = match self.resolver.require(course_id).await {
            Ok(course) => course,
            Err(err) => {
                let target = root_wiki_url(raw_path);
                debug!(course = course_id, error = %err, %target, "leaving wiki of unknown course");
                return Ok(WikiOutcome::Redirect(target));
            }
        };
        self.ensure_member(viewer, &course).await?;
        let article = self.find(&WikiPath::parse(raw_path)).await?;
        Ok(WikiOutcome::Page(WikiPage {
            article,
            course: Some(course),
        }))
    }

    /// Handle `/courses/<course_id>/course_wiki`: make sure the course's
    /// wiki article exists and redirect to it.
    pub async fn course_home(
        &self,
        viewer: &Viewer,
        course_id: &str,
    ) -> Result<WikiOutcome, Error> {
        require_login(viewer)?;
        let course = self.resolver.require(course_id).await?;
        self.ensure_member(viewer, &course).await?;
        let id = course.id();
        let slug = WikiPath::parse(course.wiki_slug());
        let article = self
            .wiki
            .create_if_missing(WikiArticle::new(slug, course.title()))
            .await
            .map_err(repository_error)?;
        info!(course = %id, article = %article.path(), "course wiki ready");
        Ok(WikiOutcome::Redirect(course_wiki_url(
            id,
            &format!("{}/", article.path()),
        )))
    }

    async fn ensure_member(&self, viewer: &Viewer, course: &Course) -> Result<(), Error> {
        if has_staff_access(Some(viewer), Some(course)) {
            return Ok(());
        }
        let account = viewer
            .account()
            .ok_or_else(|| Error::unauthorized("login required"))?;
        if self.enrollments.is_enrolled(account, course).await? {
            return Ok(());
        }
        debug!(user = %account.id(), course = %course.id(), "not enrolled in course");
        Err(Error::forbidden("You are not enrolled in this course."))
    }

    async fn find(&self, path: &WikiPath) -> Result<WikiArticle, Error> {
        self.wiki
            .find(path)
            .await
            .map_err(repository_error)?
            .ok_or_else(|| Error::not_found(format!("wiki article '{path}' not found")))
    }
}

fn require_login(viewer: &Viewer) -> Result<(), Error> {
    match viewer {
        Viewer::Authenticated(_) => Ok(()),
        Viewer::Anonymous => Err(Error::unauthorized("login required")),
    }
}
