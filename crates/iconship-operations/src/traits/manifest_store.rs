use std::path::Path;

use iconship_core::ManifestVersion;

use crate::Result;

pub trait ManifestStore: Send + Sync {
    /// Returns `None` for a manifest without a `version` field.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or its version is invalid.
    fn read_version(&self, manifest_path: &Path) -> Result<Option<ManifestVersion>>;

    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or written.
    fn write_version(&self, manifest_path: &Path, version: &ManifestVersion) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the manifest does not carry `expected`.
    fn verify_version(&self, manifest_path: &Path, expected: &ManifestVersion) -> Result<()>;
}
