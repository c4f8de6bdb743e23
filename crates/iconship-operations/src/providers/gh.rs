use std::path::Path;
use std::sync::Arc;

use crate::traits::{CommandRunner, CommandSpec, HostedRelease, HostingProvider};
use crate::{OperationError, Result};

const GH: &str = "gh";

/// Hosted releases through the GitHub CLI.
pub struct GhCliProvider {
    runner: Arc<dyn CommandRunner>,
}

impl GhCliProvider {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn release_spec(action: &str, project_root: &Path, release: &HostedRelease) -> CommandSpec {
        let notes_file = release.notes_file.to_string_lossy();
        CommandSpec::new(GH, project_root).args([
            "release",
            action,
            release.tag.as_str(),
            "--title",
            release.title.as_str(),
            "--notes-file",
            notes_file.as_ref(),
        ])
    }
}

/// True when `gh` output says the release does not exist.
fn is_not_found(output: &str) -> bool {
    let lower = output.to_lowercase();
    lower.contains("not found")
        || lower.contains("http 404")
        || lower
            .split_whitespace()
            .collect::<Vec<_>>()
            .windows(3)
            .any(|w| w == ["release", "not", "found"])
}

impl HostingProvider for GhCliProvider {
    fn auth_status(&self, project_root: &Path) -> Result<()> {
        let spec = CommandSpec::new(GH, project_root).args(["auth", "status"]);
        self.runner.run_checked("preflight", &spec)?;
        Ok(())
    }

    fn release_exists(&self, project_root: &Path, tag: &str) -> Result<bool> {
        let spec = CommandSpec::new(GH, project_root).args(["release", "view", tag, "--json", "tagName"]);
        let output = self.runner.run("hosted-release-guard", &spec)?;

        if output.success() {
            return Ok(true);
        }
        if is_not_found(&output.combined()) {
            return Ok(false);
        }

        Err(OperationError::HostedQueryFailed {
            tag: tag.to_string(),
            output: output.failure_summary(),
        })
    }

    fn create_release(&self, project_root: &Path, release: &HostedRelease) -> Result<()> {
        let spec = Self::release_spec("create", project_root, release).inherit_output();
        self.runner.run_checked("hosted-release", &spec)?;
        Ok(())
    }

    fn edit_release(&self, project_root: &Path, release: &HostedRelease) -> Result<()> {
        let spec = Self::release_spec("edit", project_root, release).inherit_output();
        self.runner.run_checked("hosted-release", &spec)?;
        Ok(())
    }

    fn create_command(&self, release: &HostedRelease) -> String {
        Self::release_spec("create", Path::new("."), release).to_string()
    }
}
