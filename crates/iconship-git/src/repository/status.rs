use crate::{HeadState, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns an error if HEAD cannot be resolved.
    pub fn head_state(&self) -> Result<HeadState> {
        let head = self.inner.head()?;

        if !head.is_branch() {
            return Ok(HeadState::Detached);
        }

        Ok(head
            .shorthand()
            .map_or(HeadState::Detached, |name| HeadState::Branch(name.to_string())))
    }

    /// Paths with staged, unstaged or untracked changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the git status operation fails.
    pub fn dirty_paths(&self) -> Result<Vec<String>> {
        let statuses = self.inner.statuses(Some(
            git2::StatusOptions::new()
                .include_untracked(true)
                .recurse_untracked_dirs(true)
                .exclude_submodules(true),
        ))?;

        Ok(statuses
            .iter()
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect())
    }
}
