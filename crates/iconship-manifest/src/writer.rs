use std::path::Path;

use iconship_core::ManifestVersion;
use serde_json::Value;

use crate::error::ManifestError;
use crate::reader::{read_document, read_version};

/// Overwrites the `version` field in place.
///
/// Key order and every other field are preserved; output is two-space
/// indented JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, parsed, or written.
pub fn write_version(path: &Path, version: &ManifestVersion) -> Result<(), ManifestError> {
    let mut doc = read_document(path)?;

    doc.insert("version".to_string(), Value::String(version.to_string()));

    let mut content = serde_json::to_string_pretty(&Value::Object(doc)).map_err(|source| {
        ManifestError::Serialize {
            path: path.to_path_buf(),
            source,
        }
    })?;
    content.push('\n');

    std::fs::write(path, content).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// # Errors
///
/// Returns `ManifestError::VerificationFailed` if the version in the manifest
/// does not match the expected version, marker included.
pub fn verify_version(path: &Path, expected: &ManifestVersion) -> Result<(), ManifestError> {
    let actual = read_version(path)?;

    if actual != *expected {
        return Err(ManifestError::VerificationFailed {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    Ok(())
}
