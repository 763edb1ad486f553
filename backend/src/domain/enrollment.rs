//! Course enrolment use-cases.

use std::sync::Arc;

use tracing::info;

use super::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use super::{Account, Course, Error};

fn repository_error(err: EnrollmentRepositoryError) -> Error {
    Error::internal(err.to_string())
}

/// Enrol accounts in courses and answer membership questions.
#[derive(Clone)]
pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl EnrollmentService {
    /// Build the service over an enrolment repository.
    pub fn new(enrollments: Arc<dyn EnrollmentRepository>) -> Self {
        Self { enrollments }
    }

    /// Enrol `account` in `course`; repeated calls are harmless.
    pub async fn enroll(&self, account: &Account, course: &Course) -> Result<(), Error> {
        self.enrollments
            .enroll(account.id(), course.id())
            .await
            .map_err(repository_error)?;
        info!(user = %account.id(), course = %course.id(), "enrolled");
        Ok(())
    }

    /// Whether `account` is enrolled in `course`.
    pub async fn is_enrolled(&self, account: &Account, course: &Course) -> Result<bool, Error> {
        self.enrollments
            .is_enrolled(account.id(), course.id())
            .await
            .map_err(repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockEnrollmentRepository;
    use crate::domain::{UserId, Username};

    fn account() -> Account {
        Account::new(UserId::random(), Username::new("u1").expect("name"), "digest")
    }

    fn toy() -> Course {
        Course::new("edX/toy/2012_Fall".parse().expect("id"), "toy")
    }

    #[tokio::test]
    async fn enroll_forwards_ids() {
        let learner = account();
        let expected_user = learner.id();
        let mut repo = MockEnrollmentRepository::new();
        repo.expect_enroll()
            .withf(move |user, course| *user == expected_user && course.to_string() == "edX/toy/2012_Fall")
            .times(1)
            .returning(|_, _| Ok(()));
        let service = EnrollmentService::new(Arc::new(repo));
        service.enroll(&learner, &toy()).await.expect("enrolled");
    }

    #[tokio::test]
    async fn backend_failures_are_internal() {
        let mut repo = MockEnrollmentRepository::new();
        repo.expect_is_enrolled()
            .returning(|_, _| Err(EnrollmentRepositoryError::backend("lock poisoned")));
        let service = EnrollmentService::new(Arc::new(repo));
        let err = service
            .is_enrolled(&account(), &toy())
            .await
            .expect_err("failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
