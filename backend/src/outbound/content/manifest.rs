//! `course.json` manifest format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Course, CourseId, CourseIdError};

/// File holding a course's metadata inside its data directory.
pub const MANIFEST_FILE: &str = "course.json";

/// On-disk course metadata.
///
/// `start` is RFC 3339; omit it for a course that is always open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseManifest {
    pub org: String,
    pub course: String,
    pub run: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_slug: Option<String>,
}

impl CourseManifest {
    /// Build the course this manifest describes, stored under `data_dir`.
    pub fn into_course(self, data_dir: &str) -> Result<Course, CourseIdError> {
        let id = CourseId::from_parts(&self.org, &self.course, &self.run)?;
        let mut course = Course::new(id, data_dir);
        if let Some(start) = self.start {
            course = course.with_start(start);
        }
        if let Some(display_name) = self.display_name {
            course = course.with_display_name(display_name);
        }
        if let Some(url_name) = self.url_name {
            course = course.with_url_name(url_name);
        }
        if let Some(wiki_slug) = self.wiki_slug {
            course = course.with_wiki_slug(wiki_slug);
        }
        Ok(course)
    }
}
