use iconship_git::CommitInfo;
use semver::Version;
use tempfile::NamedTempFile;

use crate::operations::resolve::ReleaseDecision;
use crate::operations::version_store::VersionInfo;
use crate::types::ReleaseState;
use crate::{OperationError, Result};

/// Per-run state threaded through the release steps.
#[derive(Debug)]
pub struct ReleaseData {
    pub state: ReleaseState,
    pub current: Option<VersionInfo>,
    pub decision: Option<ReleaseDecision>,
    pub notes: Option<String>,
    /// Kept alive until the run ends so the hosting CLI can read it.
    pub notes_file: Option<NamedTempFile>,
    pub commit: Option<CommitInfo>,
    /// Tag created by the run, or the one it would create in a dry run.
    pub tag: Option<String>,
    pub manifests_written: usize,
    pub history_entries_marked: usize,
}

impl ReleaseData {
    #[must_use]
    pub fn new(state: ReleaseState) -> Self {
        Self {
            state,
            current: None,
            decision: None,
            notes: None,
            notes_file: None,
            commit: None,
            tag: None,
            manifests_written: 0,
            history_entries_marked: 0,
        }
    }

    /// # Errors
    ///
    /// Returns `OperationError::MissingReleaseVersion` before a step has
    /// settled the version.
    pub fn target_version(&self) -> Result<Version> {
        self.state
            .new_version
            .clone()
            .ok_or(OperationError::MissingReleaseVersion)
    }
}
