//! Port for reading course metadata from the content store.

use async_trait::async_trait;

use crate::domain::{Course, CourseId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by content store adapters.
    pub enum CourseStoreError {
        /// The backing store could not be read.
        Backend { message: String } => "course store failed: {message}",
    }
}

/// One entry in a full store listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    /// A well-formed course.
    Course(Course),
    /// A course directory whose metadata failed to load.
    Errored {
        /// Directory the store tried to load.
        data_dir: String,
        /// Why loading failed.
        reason: String,
    },
}

/// Read-only access to courses held by the content store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Fetch a course by identifier; `Ok(None)` when it does not exist.
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, CourseStoreError>;

    /// List every entry in the store, including ones that failed to load.
    async fn list_courses(&self) -> Result<Vec<CatalogEntry>, CourseStoreError>;
}
