//! In-memory content store with bundled resources.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::domain::ports::{
    CatalogEntry, CourseResources, CourseStore, CourseStoreError, ResourceError, ResourcePath,
};
use crate::domain::{Course, CourseId};

/// Courses and their resource files, fixed at construction.
///
/// # Examples
/// ```
/// use courseware::domain::{Course, SectionContext};
/// use courseware::domain::ports::ResourcePath;
/// use courseware::outbound::memory::InMemoryCourseStore;
///
/// let toy = Course::new("edX/toy/2012_Fall".parse().expect("id"), "toy");
/// let store = InMemoryCourseStore::default()
///     .with_course(toy.clone())
///     .with_resource(&toy, ResourcePath::section(SectionContext::Info, "updates"), "<p>Hi</p>");
/// assert_eq!(store.course_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourseStore {
    entries: Vec<CatalogEntry>,
    by_id: BTreeMap<CourseId, Course>,
    resources: HashMap<(String, ResourcePath), Vec<u8>>,
}

impl InMemoryCourseStore {
    /// Add a loadable course.
    #[must_use]
    pub fn with_course(mut self, course: Course) -> Self {
        self.by_id.insert(course.id().clone(), course.clone());
        self.entries.push(CatalogEntry::Course(course));
        self
    }

    /// Add a directory whose metadata failed to load.
    #[must_use]
    pub fn with_errored(mut self, data_dir: impl Into<String>, reason: impl Into<String>) -> Self {
        self.entries.push(CatalogEntry::Errored {
            data_dir: data_dir.into(),
            reason: reason.into(),
        });
        self
    }

    /// Add a resource file to `course`'s data directory.
    #[must_use]
    pub fn with_resource(
        mut self,
        course: &Course,
        path: ResourcePath,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.resources
            .insert((course.data_dir().to_owned(), path), contents.into());
        self
    }

    /// Number of loadable courses.
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.by_id.len()
    }
}

#[async_trait]
impl CourseStore for InMemoryCourseStore {
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, CourseStoreError> {
        Ok(self.by_id.get(id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<CatalogEntry>, CourseStoreError> {
        Ok(self.entries.clone())
    }
}

#[async_trait]
impl CourseResources for InMemoryCourseStore {
    async fn read(&self, course: &Course, path: &ResourcePath) -> Result<Vec<u8>, ResourceError> {
        self.resources
            .get(&(course.data_dir().to_owned(), path.clone()))
            .cloned()
            .ok_or_else(|| ResourceError::not_found(path.as_str()))
    }
}
