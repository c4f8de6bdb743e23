use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use semver::Version;
use tracing::info;

use super::release::{ReleaseContext, configured_command, write_notes_file};
use crate::providers::Providers;
use crate::traits::{HostedRelease, Reporter};
use crate::{OperationError, Result};

#[derive(Debug, Clone, Default)]
pub struct PublishInput {
    pub tag: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Created,
    /// The hosted release already existed; its title and notes were replaced.
    Edited,
    /// Dry run.
    Planned,
}

#[derive(Debug, Clone)]
pub struct PublishOutput {
    pub tag: String,
    pub version: Version,
    pub action: PublishAction,
    pub notes: String,
}

/// Parses `<prefix>X.Y.Z` into its version.
///
/// # Errors
///
/// Returns `OperationError::InvalidTag` for anything else, including
/// pre-release and build suffixes.
pub fn parse_release_tag(tag: &str, prefix: &str) -> Result<Version> {
    let invalid = || OperationError::InvalidTag {
        tag: tag.to_string(),
        prefix: prefix.to_string(),
    };

    let rest = tag.strip_prefix(prefix).ok_or_else(invalid)?;
    let version = Version::parse(rest).map_err(|_| invalid())?;
    if !version.pre.is_empty() || !version.build.is_empty() {
        return Err(invalid());
    }
    Ok(version)
}

/// Creates or refreshes the hosted release for an existing tag and publishes
/// the packages.
///
/// Unlike a full release this is rerunnable: an existing hosted release is
/// edited rather than treated as a collision.
pub struct PublishOperation {
    providers: Providers,
    reporter: Arc<dyn Reporter>,
    today: NaiveDate,
}

impl PublishOperation {
    #[must_use]
    pub fn new(providers: Providers, reporter: Arc<dyn Reporter>, today: NaiveDate) -> Self {
        Self {
            providers,
            reporter,
            today,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the tag is malformed, the changelog cannot be read,
    /// or the hosting or publish command fails.
    pub fn execute(&self, start_path: &Path, input: &PublishInput) -> Result<PublishOutput> {
        let project = self.providers.project.discover_project(start_path)?;
        let version = parse_release_tag(input.tag.trim(), &project.config.tag_prefix)?;
        let tag = input.tag.trim().to_string();

        let changelog = self.providers.changelog.read(&project.changelog_path())?;
        let notes = changelog.release_notes(&version);

        let ctx = ReleaseContext::new(
            project,
            self.providers.clone(),
            Arc::clone(&self.reporter),
            input.dry_run,
            self.today,
        );
        let suffix = if input.dry_run { " (dry-run)" } else { "" };
        ctx.reporter()
            .info(&format!("Release publish target: {tag}{suffix}"));

        let hosting = &self.providers.hosting;
        let action = if input.dry_run {
            let planned = HostedRelease {
                tag: tag.clone(),
                title: tag.clone(),
                notes_file: PathBuf::from("<notes-file>"),
            };
            ctx.reporter().dry_run(&hosting.create_command(&planned));
            PublishAction::Planned
        } else {
            let file = write_notes_file(&notes)?;
            let release = HostedRelease {
                tag: tag.clone(),
                title: tag.clone(),
                notes_file: file.path().to_path_buf(),
            };
            if hosting.release_exists(ctx.root(), &tag)? {
                hosting.edit_release(ctx.root(), &release)?;
                PublishAction::Edited
            } else {
                hosting.create_release(ctx.root(), &release)?;
                PublishAction::Created
            }
        };

        let spec = configured_command(&ctx.config().publish_command, &ctx, "publish_command")?;
        ctx.run_command("publish", &spec)?;
        info!(%tag, ?action, "published release");

        Ok(PublishOutput {
            tag,
            version,
            action,
            notes,
        })
    }
}
