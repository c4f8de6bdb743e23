use std::path::Path;

use iconship_core::ManifestVersion;
use iconship_manifest::{ManifestError, read_manifest};

use crate::Result;
use crate::traits::ManifestStore;

pub struct FileSystemManifestStore;

impl FileSystemManifestStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestStore for FileSystemManifestStore {
    fn read_version(&self, manifest_path: &Path) -> Result<Option<ManifestVersion>> {
        let Some(raw) = read_manifest(manifest_path)?.version else {
            return Ok(None);
        };
        let version =
            ManifestVersion::parse(&raw).map_err(|source| ManifestError::InvalidVersion {
                path: manifest_path.to_path_buf(),
                source,
            })?;
        Ok(Some(version))
    }

    fn write_version(&self, manifest_path: &Path, version: &ManifestVersion) -> Result<()> {
        Ok(iconship_manifest::write_version(manifest_path, version)?)
    }

    fn verify_version(&self, manifest_path: &Path, expected: &ManifestVersion) -> Result<()> {
        Ok(iconship_manifest::verify_version(manifest_path, expected)?)
    }
}
