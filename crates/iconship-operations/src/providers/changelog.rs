use std::path::Path;

use iconship_changelog::Changelog;

use crate::Result;
use crate::traits::ChangelogIO;

pub struct FileSystemChangelogIO;

impl FileSystemChangelogIO {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemChangelogIO {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogIO for FileSystemChangelogIO {
    fn read(&self, path: &Path) -> Result<Changelog> {
        Ok(Changelog::from_file(path)?)
    }

    fn write(&self, changelog: &Changelog) -> Result<()> {
        Ok(changelog.write_to_file()?)
    }
}
