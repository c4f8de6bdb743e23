use std::path::Path;

use iconship_project::IconProject;

use crate::Result;

pub trait ProjectProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no icon monorepo can be found from the given path.
    fn discover_project(&self, start_path: &Path) -> Result<IconProject>;

    /// Raw `repository` URL of the root manifest, if declared.
    ///
    /// # Errors
    ///
    /// Returns an error if the root manifest exists but cannot be read.
    fn repository_url(&self, project: &IconProject) -> Result<Option<String>>;
}
