//! Staff access decisions.
//!
//! Group memberships are held as a typed [`Capabilities`] set. Per-course
//! staff groups keep the stored naming convention `staff_<course number>` so
//! existing group names interoperate.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Account, Course};

/// Name of an authorisation group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(String);

impl GroupName {
    /// Wrap a raw group name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the group name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derivation of per-course staff group names.
pub struct StaffGroup;

impl StaffGroup {
    /// Prefix shared by every course staff group.
    pub const PREFIX: &'static str = "staff_";

    /// Staff group for `course`.
    ///
    /// # Examples
    /// ```
    /// use courseware::domain::{Course, StaffGroup};
    ///
    /// let course = Course::new("edX/toy/2012_Fall".parse().expect("id"), "toy");
    /// assert_eq!(StaffGroup::for_course(&course).as_str(), "staff_toy");
    /// ```
    #[must_use]
    pub fn for_course(course: &Course) -> GroupName {
        GroupName(format!("{}{}", Self::PREFIX, course.number()))
    }
}

/// Set of groups an account belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<GroupName>);

impl Capabilities {
    /// Whether the set contains `group`.
    #[must_use]
    pub fn contains(&self, group: &GroupName) -> bool {
        self.0.contains(group)
    }

    /// Add a membership.
    pub fn grant(&mut self, group: GroupName) {
        self.0.insert(group);
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate memberships in name order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupName> {
        self.0.iter()
    }
}

impl FromIterator<GroupName> for Capabilities {
    fn from_iter<I: IntoIterator<Item = GroupName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    /// No session.
    Anonymous,
    /// Logged-in account.
    Authenticated(Account),
}

impl Viewer {
    /// The logged-in account, if any.
    #[must_use]
    pub fn account(&self) -> Option<&Account> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(account) => Some(account),
        }
    }
}

/// Whether `viewer` has staff privileges on `course`.
///
/// False for a missing or anonymous viewer and for a missing course; true for
/// global staff; otherwise true iff the viewer belongs to the course's staff
/// group.
pub fn has_staff_access(viewer: Option<&Viewer>, course: Option<&Course>) -> bool {
    let (Some(account), Some(course)) = (viewer.and_then(Viewer::account), course) else {
        return false;
    };
    if account.is_staff() {
        return true;
    }
    let groups: Vec<&str> = account.capabilities().iter().map(GroupName::as_str).collect();
    debug!(user = %account.username(), ?groups, "checking course staff membership");
    account
        .capabilities()
        .contains(&StaffGroup::for_course(course))
}
