use std::path::Path;

use crate::Result;

pub trait RegistryProvider: Send + Sync {
    /// Returns the authenticated user name.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry CLI is not authenticated.
    fn whoami(&self, project_root: &Path) -> Result<String>;

    /// Latest published version of `package`, `None` if it was never published.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::RegistryQueryFailed` if the registry cannot
    /// give a definitive answer.
    fn published_version(&self, project_root: &Path, package: &str) -> Result<Option<String>>;
}
