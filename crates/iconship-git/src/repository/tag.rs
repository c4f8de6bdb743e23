use crate::{Result, TagInfo};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the reference lookup fails for a reason other than
    /// the tag being absent.
    pub fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.inner.find_reference(&format!("refs/tags/{name}")) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates a lightweight tag on HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    pub fn create_tag(&self, name: &str) -> Result<TagInfo> {
        let head = self.inner.head()?.peel_to_commit()?;

        self.inner.tag_lightweight(name, head.as_object(), false)?;

        Ok(TagInfo {
            name: name.to_string(),
            target_sha: head.id().to_string(),
        })
    }
}
