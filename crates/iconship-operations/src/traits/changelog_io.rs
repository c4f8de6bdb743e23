use std::path::Path;

use iconship_changelog::Changelog;

use crate::Result;

pub trait ChangelogIO: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read.
    fn read(&self, path: &Path) -> Result<Changelog>;

    /// # Errors
    ///
    /// Returns an error if the changelog cannot be written.
    fn write(&self, changelog: &Changelog) -> Result<()>;
}
