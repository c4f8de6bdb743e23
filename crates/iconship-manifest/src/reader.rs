use std::path::Path;

use iconship_core::ManifestVersion;
use serde_json::{Map, Value};

use crate::error::ManifestError;

/// The fields of a `package.json` the release tooling cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub private: bool,
    pub repository_url: Option<String>,
}

/// Reads a manifest as an ordered JSON object.
///
/// # Errors
///
/// Returns `ManifestError::Read` if the file cannot be read,
/// `ManifestError::Parse` if the JSON is malformed, or
/// `ManifestError::NotAnObject` if the top level is not an object.
pub fn read_document(path: &Path) -> Result<Map<String, Value>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ManifestError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub fn read_manifest(path: &Path) -> Result<PackageManifest, ManifestError> {
    let doc = read_document(path)?;

    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let version = doc.get("version").and_then(Value::as_str).map(String::from);

    let private = doc.get("private").and_then(Value::as_bool).unwrap_or(false);

    let repository_url = match doc.get("repository") {
        Some(Value::String(url)) => Some(url.clone()),
        Some(Value::Object(repo)) => repo.get("url").and_then(Value::as_str).map(String::from),
        _ => None,
    };

    Ok(PackageManifest {
        name,
        version,
        private,
        repository_url,
    })
}

/// # Errors
///
/// Returns `ManifestError::MissingField` if the `version` field is absent, or
/// `ManifestError::InvalidVersion` if it is not a valid version string.
pub fn read_version(path: &Path) -> Result<ManifestVersion, ManifestError> {
    let raw = read_manifest(path)?
        .version
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "version",
        })?;

    ManifestVersion::parse(&raw).map_err(|source| ManifestError::InvalidVersion {
        path: path.to_path_buf(),
        source,
    })
}
