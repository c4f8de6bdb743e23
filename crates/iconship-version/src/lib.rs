use iconship_core::{BumpType, ManifestVersion};
use semver::Version;

/// Applies a standard semver increment, zeroing lower components.
///
/// Pre-release and build metadata are dropped.
#[must_use]
pub fn bump_version(version: &Version, bump_type: BumpType) -> Version {
    let mut new_version = Version::new(version.major, version.minor, version.patch);

    match bump_type {
        BumpType::Major => {
            new_version.major += 1;
            new_version.minor = 0;
            new_version.patch = 0;
        }
        BumpType::Minor => {
            new_version.minor += 1;
            new_version.patch = 0;
        }
        BumpType::Patch => {
            new_version.patch += 1;
        }
    }

    new_version
}

/// Computes the version a release ships as.
///
/// When the workspace carries the unreleased marker and `version` is itself
/// marked, the marker is cleared and the numeric part is returned unchanged:
/// the marker already stands for the pending change, so the requested bump
/// type does not widen it. Otherwise the bump is applied to the numeric part.
#[must_use]
pub fn increment_version(
    version: &ManifestVersion,
    bump_type: BumpType,
    has_unreleased_marker: bool,
) -> Version {
    match version {
        ManifestVersion::Unreleased(numeric) if has_unreleased_marker => numeric.clone(),
        other => bump_version(other.numeric(), bump_type),
    }
}

/// Version written to the manifests when an upstream sync lands unreleased changes.
///
/// A released version moves to the next minor with the marker; an already
/// marked version is kept so repeated syncs before a release do not stack.
#[must_use]
pub fn next_unreleased(current: &ManifestVersion) -> ManifestVersion {
    match current {
        ManifestVersion::Unreleased(_) => current.clone(),
        ManifestVersion::Released(v) => {
            ManifestVersion::Unreleased(bump_version(v, BumpType::Minor))
        }
    }
}
