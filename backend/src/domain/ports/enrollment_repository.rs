//! Port for course enrolments.

use async_trait::async_trait;

use crate::domain::{CourseId, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by enrolment adapters.
    pub enum EnrollmentRepositoryError {
        /// The backing store failed.
        Backend { message: String } => "enrollment repository failed: {message}",
    }
}

/// Persistence for who is enrolled in which course.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Record an enrolment. Enrolling twice is not an error.
    async fn enroll(&self, user: UserId, course: &CourseId) -> Result<(), EnrollmentRepositoryError>;

    /// Whether `user` is enrolled in `course`.
    async fn is_enrolled(
        &self,
        user: UserId,
        course: &CourseId,
    ) -> Result<bool, EnrollmentRepositoryError>;
}
