//! Domain ports: the edges adapters plug into.
//!
//! Each port exposes its own error enum so adapters map their failures into
//! predictable variants; services translate those into [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod course_resources;
mod course_store;
mod enrollment_repository;
mod wiki_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use course_resources::MockCourseResources;
pub use course_resources::{CourseResources, ResourceError, ResourcePath};
#[cfg(test)]
pub use course_store::MockCourseStore;
pub use course_store::{CatalogEntry, CourseStore, CourseStoreError};
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{EnrollmentRepository, EnrollmentRepositoryError};
#[cfg(test)]
pub use wiki_repository::MockWikiRepository;
pub use wiki_repository::{WikiRepository, WikiRepositoryError};
