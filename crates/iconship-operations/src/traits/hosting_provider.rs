use std::path::{Path, PathBuf};

use crate::Result;

/// A release object on the code-hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedRelease {
    pub tag: String,
    pub title: String,
    pub notes_file: PathBuf,
}

pub trait HostingProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the hosting CLI is not authenticated.
    fn auth_status(&self, project_root: &Path) -> Result<()>;

    /// Only a definitive "not found" answer yields `false`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::HostedQueryFailed` for any other failure.
    fn release_exists(&self, project_root: &Path, tag: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the release cannot be created.
    fn create_release(&self, project_root: &Path, release: &HostedRelease) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the release cannot be updated.
    fn edit_release(&self, project_root: &Path, release: &HostedRelease) -> Result<()>;

    /// Command line shown in dry runs in place of [`Self::create_release`].
    fn create_command(&self, release: &HostedRelease) -> String;
}
