//! Resolve course identifiers into open courses.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use super::ports::CourseStore;
use super::{Course, CourseId, Error, FeatureFlags};

const COURSE_NOT_FOUND: &str = "Course not found.";
const COURSE_NOT_STARTED: &str = "This course has not yet started.";

/// What a caller demands of the course it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseRequirement {
    /// Fail with not-found unless the course has started.
    pub must_be_started: bool,
    /// Fail with not-found when no identifier is supplied.
    pub required: bool,
}

impl Default for CourseRequirement {
    fn default() -> Self {
        Self {
            must_be_started: true,
            required: true,
        }
    }
}

impl CourseRequirement {
    /// Required course, open or not (about pages, enrolment).
    pub const ANY_START: Self = Self {
        must_be_started: false,
        required: true,
    };
}

/// Looks courses up in the store and applies start-date gating.
#[derive(Clone)]
pub struct CourseResolver {
    store: Arc<dyn CourseStore>,
    clock: Arc<dyn Clock + Send + Sync>,
    flags: FeatureFlags,
}

impl CourseResolver {
    /// Build a resolver.
    pub fn new(
        store: Arc<dyn CourseStore>,
        clock: Arc<dyn Clock + Send + Sync>,
        flags: FeatureFlags,
    ) -> Self {
        Self {
            store,
            clock,
            flags,
        }
    }

    /// Resolve a raw course identifier.
    ///
    /// When `requirement.required` is false, an absent or empty id yields
    /// `Ok(None)` without touching the store. Any supplied id that does not
    /// parse or does not exist fails with not-found, as does an unopened
    /// course when `requirement.must_be_started` is set.
    pub async fn resolve(
        &self,
        course_id: Option<&str>,
        requirement: CourseRequirement,
    ) -> Result<Option<Course>, Error> {
        let raw = course_id.filter(|id| !id.is_empty());
        let Some(raw) = raw else {
            if requirement.required {
                return Err(Error::not_found(COURSE_NOT_FOUND));
            }
            return Ok(None);
        };
        let id: CourseId = raw.parse().map_err(|err| {
            debug!(course = raw, error = %err, "unparseable course id");
            Error::not_found(COURSE_NOT_FOUND)
        })?;
        self.gate(&id, requirement.must_be_started).await.map(Some)
    }

    /// Resolve a required id with default gating.
    pub async fn require(&self, course_id: &str) -> Result<Course, Error> {
        self.resolve(Some(course_id), CourseRequirement::default())
            .await?
            .ok_or_else(|| Error::not_found(COURSE_NOT_FOUND))
    }

    /// Resolve a required id whether or not the course has started.
    pub async fn resolve_any(&self, course_id: &str) -> Result<Course, Error> {
        self.resolve(Some(course_id), CourseRequirement::ANY_START)
            .await?
            .ok_or_else(|| Error::not_found(COURSE_NOT_FOUND))
    }

    async fn gate(&self, id: &CourseId, must_be_started: bool) -> Result<Course, Error> {
        let course = self.lookup(id).await?;
        if must_be_started && !self.is_open(&course) {
            debug!(course = %id, "course has not started");
            return Err(Error::not_found(COURSE_NOT_STARTED));
        }
        Ok(course)
    }

    /// Whether the course counts as started, honouring the start-date override.
    #[must_use]
    pub fn is_open(&self, course: &Course) -> bool {
        course.has_started(self.clock.utc()) || self.flags.disable_start_dates
    }

    async fn lookup(&self, id: &CourseId) -> Result<Course, Error> {
        self.store
            .get_course(id)
            .await
            .map_err(|err| Error::internal(err.to_string()))?
            .ok_or_else(|| {
                debug!(course = %id, "course not in store");
                Error::not_found(COURSE_NOT_FOUND)
            })
    }
}
