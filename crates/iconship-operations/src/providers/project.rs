use std::path::Path;

use iconship_project::IconProject;

use crate::Result;
use crate::traits::ProjectProvider;

pub struct FileSystemProjectProvider;

impl FileSystemProjectProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemProjectProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectProvider for FileSystemProjectProvider {
    fn discover_project(&self, start_path: &Path) -> Result<IconProject> {
        Ok(iconship_project::discover_project(start_path)?)
    }

    fn repository_url(&self, project: &IconProject) -> Result<Option<String>> {
        Ok(project.repository_url()?)
    }
}
