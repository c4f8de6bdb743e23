use std::path::Path;

use iconship_core::{ManifestVersion, ReleaseType};
use iconship_project::IconProject;
use semver::Version;
use tracing::info;

use super::history::warn_on_mirror_failure;
use super::resolve::{ReleaseDecision, resolve_release_type};
use super::version_store::{VersionInfo, VersionStore};
use crate::Result;
use crate::providers::Providers;

#[derive(Debug, Clone, Default)]
pub struct BumpInput {
    pub requested: ReleaseType,
}

#[derive(Debug, Clone)]
pub struct BumpOutput {
    pub decision: ReleaseDecision,
    pub previous: ManifestVersion,
    pub new_version: Version,
    /// True when the unreleased marker was cleared instead of bumping.
    pub cleared_marker: bool,
    pub manifests_written: usize,
    pub history_entries_marked: usize,
}

/// Side effects of shipping a version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AppliedBump {
    pub manifests_written: usize,
    pub history_entries_marked: usize,
}

/// Writes `new_version` to every manifest and, when the marker is being
/// cleared, marks the matching history entries as released.
pub(crate) fn apply_release_version(
    project: &IconProject,
    providers: &Providers,
    current: &VersionInfo,
    new_version: &Version,
) -> Result<AppliedBump> {
    let store = VersionStore::new(project, providers.manifests.as_ref());
    let manifests_written = store.write_all(&ManifestVersion::Released(new_version.clone()))?;

    let mut history_entries_marked = 0;
    if current.clears_marker() {
        if let Some(mut ledger) = providers.history.load(project)? {
            history_entries_marked = ledger.mark_released(new_version);
            if history_entries_marked > 0 {
                let report = providers.history.save(project, &ledger)?;
                warn_on_mirror_failure(&report);
            }
        }
    }

    info!(
        version = %new_version,
        manifests = manifests_written,
        history_entries = history_entries_marked,
        "applied release version"
    );

    Ok(AppliedBump {
        manifests_written,
        history_entries_marked,
    })
}

/// Resolves the release type and bumps every manifest, without touching the
/// changelog or git.
pub struct BumpOperation {
    providers: Providers,
}

impl BumpOperation {
    #[must_use]
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    /// # Errors
    ///
    /// Returns an error if the project cannot be discovered, the release type
    /// cannot be resolved, or a manifest cannot be updated.
    pub fn execute(&self, start_path: &Path, input: &BumpInput) -> Result<BumpOutput> {
        let project = self.providers.project.discover_project(start_path)?;

        let decision =
            resolve_release_type(input.requested, &project, self.providers.history.as_ref())?;
        let current =
            VersionStore::new(&project, self.providers.manifests.as_ref()).read_current()?;
        let new_version = current.plan(decision.resolved);

        let applied = apply_release_version(&project, &self.providers, &current, &new_version)?;

        Ok(BumpOutput {
            decision,
            cleared_marker: current.clears_marker(),
            previous: current.version,
            new_version,
            manifests_written: applied.manifests_written,
            history_entries_marked: applied.history_entries_marked,
        })
    }
}
