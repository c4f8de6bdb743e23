use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::error::CoreError;

/// Literal suffix carried by a manifest version with pending, unpublished changes.
pub const UNRELEASED_SUFFIX: &str = "-unreleased";

/// A package version as recorded in a manifest.
///
/// `Unreleased` is written as `X.Y.Z-unreleased` and marks an icon-set change
/// that has not shipped yet. The numeric part is kept separately so callers
/// never inspect the suffix themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ManifestVersion {
    Released(Version),
    Unreleased(Version),
}

impl ManifestVersion {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidVersion`] if the numeric part is not valid semver.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        let (numeric, unreleased) = match raw.strip_suffix(UNRELEASED_SUFFIX) {
            Some(numeric) => (numeric, true),
            None => (raw, false),
        };

        let version = Version::parse(numeric).map_err(|source| CoreError::InvalidVersion {
            version: raw.to_string(),
            source,
        })?;

        Ok(if unreleased {
            Self::Unreleased(version)
        } else {
            Self::Released(version)
        })
    }

    #[must_use]
    pub fn numeric(&self) -> &Version {
        match self {
            Self::Released(v) | Self::Unreleased(v) => v,
        }
    }

    #[must_use]
    pub fn is_unreleased(&self) -> bool {
        matches!(self, Self::Unreleased(_))
    }

    /// Drops the marker, keeping the numeric version.
    #[must_use]
    pub fn into_released(self) -> Version {
        match self {
            Self::Released(v) | Self::Unreleased(v) => v,
        }
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Released(v) => write!(f, "{v}"),
            Self::Unreleased(v) => write!(f, "{v}{UNRELEASED_SUFFIX}"),
        }
    }
}

impl FromStr for ManifestVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
