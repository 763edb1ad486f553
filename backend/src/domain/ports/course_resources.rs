//! Port for reading files bundled with a course.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Course, SectionContext};

use super::define_port_error;

define_port_error! {
    /// Failures raised while reading a course resource.
    pub enum ResourceError {
        /// No resource exists at the path.
        NotFound { path: String } => "resource {path} not found",
        /// The path is not a plain relative path.
        InvalidPath { path: String } => "resource path {path} is not a relative path",
        /// Reading failed for another reason.
        Io { path: String, message: String } => "reading resource {path} failed: {message}",
    }
}

/// Path of a resource relative to the course's data directory.
///
/// ## Invariants
/// - Relative, `/`-separated, with no empty, `.`, or `..` segments.
///
/// # Examples
/// ```
/// use courseware::domain::SectionContext;
/// use courseware::domain::ports::ResourcePath;
///
/// let path = ResourcePath::section(SectionContext::About, "syllabus");
/// assert_eq!(path.as_str(), "about/syllabus.html");
/// assert!(ResourcePath::new("../secrets").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// Validate a relative resource path.
    pub fn new(raw: impl Into<String>) -> Result<Self, ResourceError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .split('/')
                .all(|segment| !matches!(segment, "" | "." | ".."));
        if valid {
            Ok(Self(raw))
        } else {
            Err(ResourceError::invalid_path(raw))
        }
    }

    /// Path of the HTML fragment for section `key` in `context`.
    #[must_use]
    pub fn section(context: SectionContext, key: &str) -> Self {
        Self(format!("{}/{key}.html", context.directory()))
    }

    /// Borrow the path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access to the files bundled with each course.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseResources: Send + Sync {
    /// Read the raw bytes of `path` within `course`'s resource filesystem.
    async fn read(&self, course: &Course, path: &ResourcePath) -> Result<Vec<u8>, ResourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("about/syllabus.html")]
    #[case("images/course_image.jpg")]
    fn accepts_relative_paths(#[case] raw: &str) {
        assert_eq!(ResourcePath::new(raw).expect("valid").as_str(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("/etc/passwd")]
    #[case("about/../../x")]
    #[case("about//x")]
    #[case("./about/x")]
    fn rejects_paths_that_escape_or_are_malformed(#[case] raw: &str) {
        assert_eq!(
            ResourcePath::new(raw),
            Err(ResourceError::InvalidPath { path: raw.to_owned() })
        );
    }
}
