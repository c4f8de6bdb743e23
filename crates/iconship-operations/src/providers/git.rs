use std::path::Path;
use std::sync::Arc;

use iconship_git::{CommitInfo, HeadState, Repository, TagInfo};

use crate::Result;
use crate::traits::{CommandRunner, CommandSpec, GitProvider};

const GIT: &str = "git";

/// Local repository access through `git2`. Remote access runs the `git`
/// executable so credential helpers and SSH configuration apply.
pub struct Git2Provider {
    runner: Arc<dyn CommandRunner>,
}

impl Git2Provider {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn git_spec(project_root: &Path) -> Result<CommandSpec> {
        let repo = Repository::open(project_root)?;
        Ok(CommandSpec::new(GIT, repo.root()))
    }
}

impl GitProvider for Git2Provider {
    fn head_state(&self, project_root: &Path) -> Result<HeadState> {
        let repo = Repository::open(project_root)?;
        Ok(repo.head_state()?)
    }

    fn dirty_paths(&self, project_root: &Path) -> Result<Vec<String>> {
        let repo = Repository::open(project_root)?;
        Ok(repo.dirty_paths()?)
    }

    fn local_tag_exists(&self, project_root: &Path, tag: &str) -> Result<bool> {
        let repo = Repository::open(project_root)?;
        Ok(repo.tag_exists(tag)?)
    }

    fn remote_tag_exists(&self, project_root: &Path, remote: &str, tag: &str) -> Result<bool> {
        let spec = Self::git_spec(project_root)?.args([
            "ls-remote",
            "--tags",
            remote,
            &format!("refs/tags/{tag}"),
        ]);
        let output = self.runner.run_checked("tag-guard", &spec)?;
        Ok(!output.stdout.trim().is_empty())
    }

    fn stage_all(&self, project_root: &Path) -> Result<()> {
        let repo = Repository::open(project_root)?;
        Ok(repo.stage_all()?)
    }

    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo> {
        let repo = Repository::open(project_root)?;
        Ok(repo.commit(message)?)
    }

    fn create_tag(&self, project_root: &Path, tag: &str) -> Result<TagInfo> {
        let repo = Repository::open(project_root)?;
        Ok(repo.create_tag(tag)?)
    }

    fn push(&self, project_root: &Path, remote: &str, refspec: &str) -> Result<()> {
        let spec = Self::git_spec(project_root)?.args(["push", remote, refspec]);
        self.runner.run_checked("push", &spec)?;
        Ok(())
    }

    fn remote_url(&self, project_root: &Path, remote: &str) -> Result<Option<String>> {
        let repo = Repository::open(project_root)?;
        Ok(repo.remote_url(remote)?)
    }
}
