use std::fmt;

use iconship_core::{BumpType, ReleaseType};
use semver::Version;

/// Which release flow an orchestrator run follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    /// Bump, changelog, build, commit, tag, push, hosted release, publish.
    #[default]
    Local,
    /// Ship the version a previous `prepare` committed.
    Ci,
    /// Bump and changelog only.
    Prepare,
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::Ci => "ci",
            Self::Prepare => "prepare",
        };
        write!(f, "{s}")
    }
}

/// What a run has done so far.
///
/// Steps flip their flag once their side effect has happened (or, in a dry
/// run, once it has been reported). Nothing is rolled back on failure; the
/// flags drive the recovery guide instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseState {
    pub mode: ReleaseMode,
    pub dry_run: bool,
    pub requested: ReleaseType,
    pub resolved: Option<BumpType>,
    pub previous_version: Option<Version>,
    pub new_version: Option<Version>,
    pub version_bumped: bool,
    pub changelog_updated: bool,
    pub build_completed: bool,
    pub commit_created: bool,
    pub tag_created: bool,
    pub pushed: bool,
    pub hosted_release_created: bool,
    pub packages_published: bool,
}

impl ReleaseState {
    #[must_use]
    pub fn new(mode: ReleaseMode, requested: ReleaseType, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            requested,
            ..Self::default()
        }
    }
}
