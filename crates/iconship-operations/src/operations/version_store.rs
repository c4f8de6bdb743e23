use iconship_core::{BumpType, ManifestVersion};
use iconship_project::IconProject;
use iconship_version::increment_version;
use semver::Version;
use tracing::{debug, warn};

use crate::traits::ManifestStore;
use crate::{OperationError, Result};

/// The workspace version as read from every package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// First version encountered, in manifest directory order.
    pub version: ManifestVersion,
    /// True if any manifest carries the unreleased marker.
    pub has_unreleased_marker: bool,
    /// Every distinct version, in first-seen order.
    pub distinct_versions: Vec<ManifestVersion>,
}

impl VersionInfo {
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.distinct_versions.len() <= 1
    }

    /// The version a release of `bump` ships as.
    #[must_use]
    pub fn plan(&self, bump: BumpType) -> Version {
        increment_version(&self.version, bump, self.has_unreleased_marker)
    }

    /// True when shipping clears the marker instead of bumping.
    #[must_use]
    pub fn clears_marker(&self) -> bool {
        self.has_unreleased_marker && self.version.is_unreleased()
    }
}

/// The version field duplicated across every package manifest.
pub struct VersionStore<'a> {
    project: &'a IconProject,
    manifests: &'a dyn ManifestStore,
}

impl<'a> VersionStore<'a> {
    #[must_use]
    pub fn new(project: &'a IconProject, manifests: &'a dyn ManifestStore) -> Self {
        Self { project, manifests }
    }

    /// Reads every versioned manifest. Drift between manifests is logged and
    /// tolerated; the first version wins.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NoManifests` if no manifest declares a
    /// version, or an error if a manifest cannot be read.
    pub fn read_current(&self) -> Result<VersionInfo> {
        let mut distinct: Vec<ManifestVersion> = Vec::new();

        for path in &self.project.manifests {
            if let Some(version) = self.manifests.read_version(path)? {
                if !distinct.contains(&version) {
                    distinct.push(version);
                }
            }
        }

        let Some(version) = distinct.first().cloned() else {
            return Err(OperationError::NoManifests(
                self.project.root.join(&self.project.config.packages_dir),
            ));
        };

        if distinct.len() > 1 {
            let versions: Vec<String> = distinct.iter().map(ToString::to_string).collect();
            warn!(
                versions = %versions.join(", "),
                using = %version,
                "package versions are not aligned"
            );
        }

        Ok(VersionInfo {
            has_unreleased_marker: distinct.iter().any(ManifestVersion::is_unreleased),
            version,
            distinct_versions: distinct,
        })
    }

    /// Writes `version` to every manifest that declares one and reads each
    /// back. Returns the number of manifests written.
    ///
    /// # Errors
    ///
    /// Returns the first read, write or verification failure. Manifests
    /// written before the failure keep the new version.
    pub fn write_all(&self, version: &ManifestVersion) -> Result<usize> {
        let mut written = 0;

        for path in &self.project.manifests {
            let Some(old) = self.manifests.read_version(path)? else {
                debug!(manifest = %path.display(), "skipping manifest without version");
                continue;
            };
            self.manifests.write_version(path, version)?;
            self.manifests.verify_version(path, version)?;
            debug!(manifest = %path.display(), %old, new = %version, "updated manifest version");
            written += 1;
        }

        Ok(written)
    }
}
