//! Course identity and metadata.
//!
//! A course is addressed by organisation, course number, and run, rendered as
//! `org/number/run` (for example `edX/toy/2012_Fall`). Courses are loaded by
//! the content store and are immutable from the domain's point of view.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Path prefix under which every course-scoped page lives.
pub const COURSES_PREFIX: &str = "/courses/";

/// Validation errors returned when parsing a [`CourseId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseIdError {
    /// Identifier did not have exactly three `/`-separated segments.
    #[error("course id must have the form org/number/run, got {0:?}")]
    Shape(String),
    /// A segment was empty.
    #[error("course id segment {segment} must not be empty")]
    EmptySegment {
        /// Name of the offending segment.
        segment: &'static str,
    },
    /// A segment used characters outside `[A-Za-z0-9._-]`.
    #[error("course id segment {segment} contains invalid characters: {value:?}")]
    InvalidCharacters {
        /// Name of the offending segment.
        segment: &'static str,
        /// Raw segment value.
        value: String,
    },
}

/// Course identifier: organisation, course number, and run.
///
/// ## Invariants
/// - Each segment is non-empty and limited to ASCII letters, digits, `.`,
///   `_`, and `-`.
///
/// # Examples
/// ```
/// use courseware::domain::CourseId;
///
/// let id: CourseId = "edX/toy/2012_Fall".parse().expect("valid id");
/// assert_eq!(id.org(), "edX");
/// assert_eq!(id.number(), "toy");
/// assert_eq!(id.run(), "2012_Fall");
/// assert_eq!(id.to_string(), "edX/toy/2012_Fall");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId {
    org: String,
    number: String,
    run: String,
}

fn check_segment(segment: &'static str, value: &str) -> Result<(), CourseIdError> {
    if value.is_empty() {
        return Err(CourseIdError::EmptySegment { segment });
    }
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !valid {
        return Err(CourseIdError::InvalidCharacters {
            segment,
            value: value.to_owned(),
        });
    }
    Ok(())
}

impl CourseId {
    /// Build an identifier from its parts.
    pub fn from_parts(org: &str, number: &str, run: &str) -> Result<Self, CourseIdError> {
        check_segment("org", org)?;
        check_segment("number", number)?;
        check_segment("run", run)?;
        Ok(Self {
            org: org.to_owned(),
            number: number.to_owned(),
            run: run.to_owned(),
        })
    }

    /// Extract a course identifier from a course-scoped path or absolute URL.
    ///
    /// Returns `None` unless the path starts with `/courses/<org>/<number>/<run>`.
    ///
    /// # Examples
    /// ```
    /// use courseware::domain::CourseId;
    ///
    /// let id = CourseId::from_url("http://testserver/courses/edX/toy/2012_Fall/progress");
    /// assert_eq!(id.map(|id| id.to_string()).as_deref(), Some("edX/toy/2012_Fall"));
    /// assert!(CourseId::from_url("/wiki/some/page/").is_none());
    /// ```
    #[must_use]
    pub fn from_url(raw: &str) -> Option<Self> {
        let path = match Url::parse(raw) {
            Ok(url) => url.path().to_owned(),
            Err(_) => raw
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_owned(),
        };
        let rest = path.strip_prefix(COURSES_PREFIX)?;
        let mut segments = rest.split('/');
        let org = segments.next()?;
        let number = segments.next()?;
        let run = segments.next()?;
        Self::from_parts(org, number, run).ok()
    }

    /// Organisation (university) segment.
    #[must_use]
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Course number segment.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Run (term) segment.
    #[must_use]
    pub fn run(&self) -> &str {
        &self.run
    }

    /// Site-relative URL of a page under this course, e.g. `/courses/edX/toy/2012_Fall/info`.
    #[must_use]
    pub fn page_url(&self, page: &str) -> String {
        format!("{COURSES_PREFIX}{self}/{page}")
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.org, self.number, self.run)
    }
}

impl FromStr for CourseId {
    type Err = CourseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(org), Some(number), Some(run), None) => Self::from_parts(org, number, run),
            _ => Err(CourseIdError::Shape(s.to_owned())),
        }
    }
}

impl TryFrom<String> for CourseId {
    type Error = CourseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseId> for String {
    fn from(value: CourseId) -> Self {
        value.to_string()
    }
}

/// A course as loaded from the content store.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use courseware::domain::{Course, CourseId};
///
/// let id: CourseId = "edX/toy/2012_Fall".parse().expect("valid id");
/// let course = Course::new(id, "toy").with_display_name("Toy Course");
/// assert_eq!(course.title(), "Toy Course");
/// assert_eq!(course.wiki_slug(), "toy");
/// assert!(course.has_started(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    data_dir: String,
    start: Option<DateTime<Utc>>,
    display_name: Option<String>,
    url_name: String,
    wiki_slug: String,
}

impl Course {
    /// Create a course with no start date whose url name is the run and whose
    /// wiki slug is the course number.
    pub fn new(id: CourseId, data_dir: impl Into<String>) -> Self {
        let url_name = id.run().to_owned();
        let wiki_slug = id.number().to_owned();
        Self {
            id,
            data_dir: data_dir.into(),
            start: None,
            display_name: None,
            url_name,
            wiki_slug,
        }
    }

    /// Set the moment the course opens.
    #[must_use]
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the human-readable course title.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Override the url name used as a title fallback.
    #[must_use]
    pub fn with_url_name(mut self, url_name: impl Into<String>) -> Self {
        self.url_name = url_name.into();
        self
    }

    /// Override the wiki slug.
    #[must_use]
    pub fn with_wiki_slug(mut self, wiki_slug: impl Into<String>) -> Self {
        self.wiki_slug = wiki_slug.into();
        self
    }

    /// Course identifier.
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    /// Organisation that owns the course.
    #[must_use]
    pub fn org(&self) -> &str {
        self.id.org()
    }

    /// Course number.
    #[must_use]
    pub fn number(&self) -> &str {
        self.id.number()
    }

    /// Directory holding the course's bundled resources and static assets.
    #[must_use]
    pub fn data_dir(&self) -> &str {
        &self.data_dir
    }

    /// Start timestamp, if one is set.
    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Display name, if one is set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Url name of the course root.
    #[must_use]
    pub fn url_name(&self) -> &str {
        &self.url_name
    }

    /// Slug of the course's root wiki article.
    #[must_use]
    pub fn wiki_slug(&self) -> &str {
        &self.wiki_slug
    }

    /// Display name, falling back to the url name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.url_name)
    }

    /// Whether the course has opened at `now`. Courses without a start date
    /// are always open.
    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| start <= now)
    }
}
