//! In-memory `EnrollmentRepository`.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{CourseId, UserId};

use super::POISONED;

/// Enrolments held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryEnrollmentRepository {
    enrollments: RwLock<HashSet<(UserId, CourseId)>>,
}

impl InMemoryEnrollmentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn enroll(&self, user: UserId, course: &CourseId) -> Result<(), EnrollmentRepositoryError> {
        self.enrollments
            .write()
            .map_err(|_| EnrollmentRepositoryError::backend(POISONED))?
            .insert((user, course.clone()));
        Ok(())
    }

    async fn is_enrolled(
        &self,
        user: UserId,
        course: &CourseId,
    ) -> Result<bool, EnrollmentRepositoryError> {
        let enrollments = self
            .enrollments
            .read()
            .map_err(|_| EnrollmentRepositoryError::backend(POISONED))?;
        Ok(enrollments.contains(&(user, course.clone())))
    }
}
