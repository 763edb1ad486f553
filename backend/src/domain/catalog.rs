//! Course catalogue listing grouped by organisation.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::access::has_staff_access;
use super::ports::{CatalogEntry, CourseStore};
use super::{Course, Error, FeatureFlags, Viewer};

/// Courses keyed by organisation, each list ordered by course number.
pub type CoursesByOrganization = BTreeMap<String, Vec<Course>>;

/// Builds the catalogue from the content store.
#[derive(Clone)]
pub struct CourseCatalog {
    store: Arc<dyn CourseStore>,
    flags: FeatureFlags,
}

impl CourseCatalog {
    /// Build a catalogue over the content store.
    pub fn new(store: Arc<dyn CourseStore>, flags: FeatureFlags) -> Self {
        Self { store, flags }
    }

    /// List every loadable course grouped by organisation.
    ///
    /// Entries that failed to load are skipped. With the migration flag set
    /// only courses `viewer` has staff access to are kept.
    pub async fn courses_by_organization(
        &self,
        viewer: Option<&Viewer>,
    ) -> Result<CoursesByOrganization, Error> {
        let entries = self
            .store
            .list_courses()
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        let mut courses: Vec<Course> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                CatalogEntry::Course(course) => Some(course),
                CatalogEntry::Errored { data_dir, reason } => {
                    debug!(data_dir = %data_dir, reason = %reason, "skipping errored course");
                    None
                }
            })
            .collect();
        courses.sort_by(|a, b| a.number().cmp(b.number()));

        let mut grouped = CoursesByOrganization::new();
        for course in courses {
            if self.flags.enable_lms_migration && !has_staff_access(viewer, Some(&course)) {
                continue;
            }
            grouped
                .entry(course.org().to_owned())
                .or_default()
                .push(course);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockCourseStore;
    use crate::domain::{Account, GroupName, UserId, Username};
    use rstest::{fixture, rstest};

    fn course(id: &str) -> Course {
        let parsed: crate::domain::CourseId = id.parse().expect("id");
        let dir = parsed.number().to_owned();
        Course::new(parsed, dir)
    }

    #[fixture]
    fn entries() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::Course(course("MITx/6.002x/2012_Fall")),
            CatalogEntry::Errored {
                data_dir: "broken".to_owned(),
                reason: "missing course.json".to_owned(),
            },
            CatalogEntry::Course(course("edX/toy/2012_Fall")),
            CatalogEntry::Course(course("edX/simple/2012_Fall")),
            CatalogEntry::Course(course("MITx/3.091x/2012_Fall")),
        ]
    }

    fn catalog(entries: Vec<CatalogEntry>, flags: FeatureFlags) -> CourseCatalog {
        let mut store = MockCourseStore::new();
        store
            .expect_list_courses()
            .return_once(move || Ok(entries));
        CourseCatalog::new(Arc::new(store), flags)
    }

    fn numbers(grouped: &CoursesByOrganization, org: &str) -> Vec<String> {
        grouped
            .get(org)
            .map(|courses| courses.iter().map(|c| c.number().to_owned()).collect())
            .unwrap_or_default()
    }

    #[rstest]
    #[tokio::test]
    async fn groups_by_org_sorted_by_number(entries: Vec<CatalogEntry>) {
        let grouped = catalog(entries, FeatureFlags::default())
            .courses_by_organization(None)
            .await
            .expect("catalogue");
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["MITx", "edX"]);
        assert_eq!(numbers(&grouped, "MITx"), vec!["3.091x", "6.002x"]);
        assert_eq!(numbers(&grouped, "edX"), vec!["simple", "toy"]);
    }

    #[rstest]
    #[tokio::test]
    async fn migration_mode_shows_only_staffed_courses(entries: Vec<CatalogEntry>) {
        let flags = FeatureFlags {
            enable_lms_migration: true,
            ..FeatureFlags::default()
        };
        let viewer = Viewer::Authenticated(
            Account::new(UserId::random(), Username::new("u2").expect("name"), "digest")
                .with_active(true)
                .with_capabilities([GroupName::new("staff_toy")].into_iter().collect()),
        );
        let grouped = catalog(entries, flags)
            .courses_by_organization(Some(&viewer))
            .await
            .expect("catalogue");
        assert_eq!(grouped.len(), 1);
        assert_eq!(numbers(&grouped, "edX"), vec!["toy"]);
    }

    #[rstest]
    #[tokio::test]
    async fn migration_mode_hides_everything_from_anonymous(entries: Vec<CatalogEntry>) {
        let flags = FeatureFlags {
            enable_lms_migration: true,
            ..FeatureFlags::default()
        };
        let grouped = catalog(entries, flags)
            .courses_by_organization(Some(&Viewer::Anonymous))
            .await
            .expect("catalogue");
        assert!(grouped.is_empty());
    }
}
