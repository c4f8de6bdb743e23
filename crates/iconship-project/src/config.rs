use std::path::{Path, PathBuf};

use iconship_history::DEFAULT_HISTORY_LIMIT;
use serde::Deserialize;

use crate::CONFIG_FILE;
use crate::error::ProjectError;

/// Repository layout and release commands, read from `release.toml`.
///
/// Every key is optional; the defaults describe the standard icon monorepo
/// layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    pub packages_dir: PathBuf,
    pub changelog: PathBuf,
    pub history: PathBuf,
    pub history_mirror: Option<PathBuf>,
    /// Manifest whose version CI releases trust as already prepared.
    pub version_source: PathBuf,
    pub main_branch: String,
    pub remote: String,
    pub tag_prefix: String,
    pub required_tools: Vec<String>,
    pub build_command: Vec<String>,
    pub publish_command: Vec<String>,
    pub history_limit: usize,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            packages_dir: PathBuf::from("packages"),
            changelog: PathBuf::from("CHANGELOG.md"),
            history: PathBuf::from("metadata/update-history.json"),
            history_mirror: Some(PathBuf::from("packages/metadata/update-history.json")),
            version_source: PathBuf::from("packages/metadata/package.json"),
            main_branch: String::from("main"),
            remote: String::from("origin"),
            tag_prefix: String::from("v"),
            required_tools: ["git", "gh", "npm", "pnpm"].map(String::from).to_vec(),
            build_command: ["pnpm", "run", "build"].map(String::from).to_vec(),
            publish_command: ["pnpm", "run", "publish-packages"]
                .map(String::from)
                .to_vec(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ReleaseConfig {
    fn validate(self, path: &Path) -> Result<Self, ProjectError> {
        let invalid = |reason| ProjectError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        if self.build_command.is_empty() {
            return Err(invalid("build_command must not be empty"));
        }
        if self.publish_command.is_empty() {
            return Err(invalid("publish_command must not be empty"));
        }
        if self.history_limit == 0 {
            return Err(invalid("history_limit must be at least 1"));
        }
        if self.main_branch.trim().is_empty() {
            return Err(invalid("main_branch must not be empty"));
        }

        Ok(self)
    }
}

/// # Errors
///
/// Returns `ProjectError::ConfigParse` for malformed TOML or unknown keys and
/// `ProjectError::InvalidConfig` for values that cannot drive a release.
pub fn parse_config(content: &str, path: &Path) -> Result<ReleaseConfig, ProjectError> {
    let config: ReleaseConfig =
        toml::from_str(content).map_err(|source| ProjectError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    config.validate(path)
}

/// Loads `release.toml` from `root`, falling back to defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(root: &Path) -> Result<ReleaseConfig, ProjectError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ReleaseConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ProjectError::ConfigRead {
        path: path.clone(),
        source,
    })?;

    parse_config(&content, &path)
}
