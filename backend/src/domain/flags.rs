//! Feature flags injected into services.

/// Process-wide feature switches, passed explicitly to the services that
/// consult them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Treat every course as started.
    pub disable_start_dates: bool,
    /// Allow browsing the wiki through `/wiki/...` URLs.
    pub allow_wiki_root_access: bool,
    /// Restrict catalogue listings to courses the viewer can staff.
    pub enable_lms_migration: bool,
}
