//! In-memory HTTP state for handler tests.

use std::sync::Arc;

use crate::domain::ports::{CourseResources, CourseStore};
use crate::domain::{
    Account, AccountService, Course, EnrollmentService, FeatureFlags, GroupName, StaticAssets,
    UserId, Username, password_digest,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{
    InMemoryAccountRepository, InMemoryCourseStore, InMemoryEnrollmentRepository,
    InMemoryWikiRepository,
};

use super::fixtures::{FixtureClock, fixture_store};

/// Password given to every account the harness creates.
pub const PASSWORD: &str = "foo";

/// Handler state over in-memory adapters with direct access to the stores.
pub struct TestHarness {
    pub state: HttpState,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub enrollments: Arc<InMemoryEnrollmentRepository>,
    pub wiki: Arc<InMemoryWikiRepository>,
}

impl TestHarness {
    /// Harness over the fixture courses with every flag off.
    #[must_use]
    pub fn new() -> Self {
        Self::with_flags(FeatureFlags::default())
    }

    /// Harness over the fixture courses with the given flags.
    #[must_use]
    pub fn with_flags(flags: FeatureFlags) -> Self {
        Self::build(fixture_store(), flags)
    }

    /// Harness over an arbitrary content store.
    #[must_use]
    pub fn build(store: InMemoryCourseStore, flags: FeatureFlags) -> Self {
        let store = Arc::new(store);
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let enrollments = Arc::new(InMemoryEnrollmentRepository::new());
        let wiki = Arc::new(InMemoryWikiRepository::new());
        let courses: Arc<dyn CourseStore> = store.clone();
        let resources: Arc<dyn CourseResources> = store;
        let ports = HttpStatePorts {
            courses,
            resources,
            accounts: accounts.clone(),
            enrollments: enrollments.clone(),
            wiki: wiki.clone(),
            clock: Arc::new(FixtureClock::default()),
        };
        Self {
            state: HttpState::new(ports, flags, StaticAssets::default()),
            accounts,
            enrollments,
            wiki,
        }
    }

    /// Provision an active account with [`PASSWORD`] and the given groups.
    ///
    /// # Panics
    /// When the username is invalid or already taken.
    pub async fn account(&self, username: &str, is_staff: bool, groups: &[&str]) -> Account {
        let name = Username::new(username).expect("fixture username");
        let digest = password_digest(&name, PASSWORD);
        let account = Account::new(UserId::random(), name, digest)
            .with_active(true)
            .with_staff(is_staff)
            .with_capabilities(groups.iter().copied().map(GroupName::new).collect());
        AccountService::new(self.accounts.clone())
            .provision(account.clone())
            .await
            .expect("provision fixture account");
        account
    }

    /// Enrol `account` in `course`.
    ///
    /// # Panics
    /// When the enrolment store fails.
    pub async fn enroll(&self, account: &Account, course: &Course) {
        EnrollmentService::new(self.enrollments.clone())
            .enroll(account, course)
            .await
            .expect("enrol fixture account");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
