//! Shared HTTP adapter state.
//!
//! Handlers receive this state through `actix_web::web::Data`, so they depend
//! only on domain services and stay testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountRepository, CourseResources, CourseStore, EnrollmentRepository, WikiRepository,
};
use crate::domain::{
    AccountService, CourseCatalog, CourseResolver, EnrollmentService, FeatureFlags,
    SectionContentLoader, StaticAssets, WikiNavigator,
};

/// Parameter object bundling every port implementation the handlers need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub courses: Arc<dyn CourseStore>,
    pub resources: Arc<dyn CourseResources>,
    pub accounts: Arc<dyn AccountRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub wiki: Arc<dyn WikiRepository>,
    pub clock: Arc<dyn Clock + Send + Sync>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub resolver: CourseResolver,
    pub sections: SectionContentLoader,
    pub catalog: CourseCatalog,
    pub accounts: AccountService,
    pub enrollments: EnrollmentService,
    pub wiki: WikiNavigator,
    pub assets: StaticAssets,
    pub flags: FeatureFlags,
}

impl HttpState {
    /// Wire the domain services over `ports`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use courseware::domain::{FeatureFlags, StaticAssets};
    /// use courseware::inbound::http::state::{HttpState, HttpStatePorts};
    /// use courseware::outbound::memory::{
    ///     InMemoryAccountRepository, InMemoryCourseStore, InMemoryEnrollmentRepository,
    ///     InMemoryWikiRepository,
    /// };
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryCourseStore::default());
    /// let ports = HttpStatePorts {
    ///     courses: store.clone(),
    ///     resources: store,
    ///     accounts: Arc::new(InMemoryAccountRepository::new()),
    ///     enrollments: Arc::new(InMemoryEnrollmentRepository::new()),
    ///     wiki: Arc::new(InMemoryWikiRepository::new()),
    ///     clock: Arc::new(DefaultClock),
    /// };
    /// let state = HttpState::new(ports, FeatureFlags::default(), StaticAssets::default());
    /// assert_eq!(state.assets.base_url(), "/static/");
    /// ```
    pub fn new(ports: HttpStatePorts, flags: FeatureFlags, assets: StaticAssets) -> Self {
        let HttpStatePorts {
            courses,
            resources,
            accounts,
            enrollments,
            wiki,
            clock,
        } = ports;
        let resolver = CourseResolver::new(courses.clone(), clock, flags);
        let enrollments = EnrollmentService::new(enrollments);
        Self {
            sections: SectionContentLoader::new(resources, assets.clone()),
            catalog: CourseCatalog::new(courses, flags),
            accounts: AccountService::new(accounts),
            wiki: WikiNavigator::new(wiki, resolver.clone(), enrollments.clone(), flags),
            resolver,
            enrollments,
            assets,
            flags,
        }
    }
}
