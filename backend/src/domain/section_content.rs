//! Load about and info page fragments for a course.
//!
//! About and info sections treat a missing file differently: a missing about
//! section is simply absent (the page omits it), while a missing info section
//! is rendered as a visible placeholder and logged as an error.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use super::ports::{CourseResources, ResourceError, ResourcePath};
use super::{AboutSection, Course, InfoSection, SectionContext, SectionKeyError, StaticAssets};

/// Text shown in place of an info section whose file is missing.
pub const INFO_SECTION_MISSING: &str = "! Info section missing !";

/// Failures while loading a section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    /// The key is not valid for the page context.
    #[error(transparent)]
    InvalidKey(#[from] SectionKeyError),
    /// The resource exists but is not UTF-8 text.
    #[error("resource {path} is not valid UTF-8")]
    Decode {
        /// Resource that failed to decode.
        path: String,
    },
    /// The resource could not be read.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl From<SectionError> for super::Error {
    fn from(err: SectionError) -> Self {
        match err {
            SectionError::InvalidKey(SectionKeyError::InvalidKey { context, key }) => {
                let message = format!("Invalid {context} key {key}");
                Self::invalid_request(message).with_details(json!({
                    "context": context.directory(),
                    "key": key,
                }))
            }
            other => Self::internal(other.to_string()),
        }
    }
}

/// Reads section fragments from the course resource filesystem and scopes
/// their static URLs to the course.
#[derive(Clone)]
pub struct SectionContentLoader {
    resources: Arc<dyn CourseResources>,
    assets: StaticAssets,
}

impl SectionContentLoader {
    /// Build a loader over a resource port.
    pub fn new(resources: Arc<dyn CourseResources>, assets: StaticAssets) -> Self {
        Self { resources, assets }
    }

    /// Static asset resolver used for rewriting.
    #[must_use]
    pub fn assets(&self) -> &StaticAssets {
        &self.assets
    }

    /// Load an about section.
    ///
    /// `title`, `university` and `number` come from course metadata. Other
    /// keys read `about/<key>.html`; a missing file yields `Ok(None)`.
    pub async fn load_about_section(
        &self,
        course: &Course,
        key: &str,
    ) -> Result<Option<String>, SectionError> {
        let section: AboutSection = key.parse()?;
        match section {
            AboutSection::Title => return Ok(Some(course.title().to_owned())),
            AboutSection::University => return Ok(Some(course.org().to_owned())),
            AboutSection::Number => return Ok(Some(course.number().to_owned())),
            _ => {}
        }
        let path = ResourcePath::section(SectionContext::About, section.as_str());
        match self.read_text(course, &path).await {
            Ok(text) => Ok(Some(text)),
            Err(SectionError::Resource(ResourceError::NotFound { .. })) => {
                warn!(
                    section = section.as_str(),
                    course = %course.id(),
                    "missing about section"
                );
                Ok(None)
            }
            Err(err) => {
                error!(
                    section = section.as_str(),
                    course = %course.id(),
                    error = %err,
                    "failed to load about section"
                );
                Err(err)
            }
        }
    }

    /// Load an info section, substituting [`INFO_SECTION_MISSING`] when the
    /// file does not exist.
    pub async fn load_info_section(&self, course: &Course, key: &str) -> Result<String, SectionError> {
        let section: InfoSection = key.parse()?;
        let path = ResourcePath::section(SectionContext::Info, section.as_str());
        match self.read_text(course, &path).await {
            Ok(text) => Ok(text),
            Err(SectionError::Resource(ResourceError::NotFound { .. })) => {
                error!(
                    section = section.as_str(),
                    course = %course.id(),
                    "missing info section"
                );
                Ok(INFO_SECTION_MISSING.to_owned())
            }
            Err(err) => {
                error!(
                    section = section.as_str(),
                    course = %course.id(),
                    error = %err,
                    "failed to load info section"
                );
                Err(err)
            }
        }
    }

    async fn read_text(&self, course: &Course, path: &ResourcePath) -> Result<String, SectionError> {
        let bytes = self.resources.read(course, path).await?;
        let text = String::from_utf8(bytes).map_err(|_| SectionError::Decode {
            path: path.to_string(),
        })?;
        Ok(self.assets.rewrite_urls(&text, course.data_dir()))
    }
}
