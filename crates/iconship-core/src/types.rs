use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        };
        write!(f, "{s}")
    }
}

impl FromStr for BumpType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            other => Err(CoreError::InvalidVersionType {
                value: other.to_string(),
                expected: "patch, minor, major",
            }),
        }
    }
}

/// The bump an operator asks for. `Auto` defers to the update history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Patch,
    Minor,
    Major,
    #[default]
    Auto,
}

impl ReleaseType {
    /// Returns the explicit bump, or `None` for `Auto`.
    #[must_use]
    pub fn as_bump(self) -> Option<BumpType> {
        match self {
            Self::Patch => Some(BumpType::Patch),
            Self::Minor => Some(BumpType::Minor),
            Self::Major => Some(BumpType::Major),
            Self::Auto => None,
        }
    }
}

impl From<BumpType> for ReleaseType {
    fn from(bump: BumpType) -> Self {
        match bump {
            BumpType::Patch => Self::Patch,
            BumpType::Minor => Self::Minor,
            BumpType::Major => Self::Major,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_bump() {
            Some(bump) => bump.fmt(f),
            None => write!(f, "auto"),
        }
    }
}

impl FromStr for ReleaseType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto" => Ok(Self::Auto),
            other => other
                .parse::<BumpType>()
                .map(Self::from)
                .map_err(|_| CoreError::InvalidVersionType {
                    value: other.to_string(),
                    expected: "patch, minor, major, auto",
                }),
        }
    }
}

/// Tally of the icon names touched by one upstream sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub total: usize,
}

impl ChangeCounts {
    #[must_use]
    pub fn new(added: usize, updated: usize, removed: usize) -> Self {
        Self {
            added,
            updated,
            removed,
            total: added + updated + removed,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl fmt::Display for ChangeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added={}, updated={}, removed={}, total={}",
            self.added, self.updated, self.removed, self.total
        )
    }
}

/// A publishable package discovered in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub manifest_path: std::path::PathBuf,
    pub private: bool,
}

#[must_use]
pub fn tag_name(prefix: &str, version: &Version) -> String {
    format!("{prefix}{version}")
}
