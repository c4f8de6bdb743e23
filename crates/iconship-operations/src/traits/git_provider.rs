use std::path::Path;

use iconship_git::{CommitInfo, HeadState, TagInfo};

use crate::Result;

pub trait GitProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn head_state(&self, project_root: &Path) -> Result<HeadState>;

    /// Paths with staged, unstaged or untracked changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or status check fails.
    fn dirty_paths(&self, project_root: &Path) -> Result<Vec<String>>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn local_tag_exists(&self, project_root: &Path, tag: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the remote cannot be queried.
    fn remote_tag_exists(&self, project_root: &Path, remote: &str, tag: &str) -> Result<bool>;

    /// Stages every change in the working tree, including deletions.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be updated.
    fn stage_all(&self, project_root: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo>;

    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    fn create_tag(&self, project_root: &Path, tag: &str) -> Result<TagInfo>;

    /// # Errors
    ///
    /// Returns an error if the push is rejected or cannot be run.
    fn push(&self, project_root: &Path, remote: &str, refspec: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn remote_url(&self, project_root: &Path, remote: &str) -> Result<Option<String>>;
}
