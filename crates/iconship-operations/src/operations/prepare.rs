use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use iconship_core::{ReleaseType, tag_name};
use semver::Version;

use super::release::{ReleaseContext, ReleaseOutput, release_pipeline, run_pipeline};
use crate::providers::Providers;
use crate::traits::Reporter;
use crate::types::{ReleaseMode, ReleaseState};
use crate::{OperationError, Result};

#[derive(Debug, Clone, Default)]
pub struct PrepareInput {
    pub requested: ReleaseType,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub enum PrepareOutcome {
    /// The working tree had no pending changes to release.
    NothingToDo,
    Prepared {
        previous: Version,
        new_version: Version,
        /// Tag a later CI release will create.
        next_tag: String,
        output: Box<ReleaseOutput>,
    },
}

/// Bumps versions and finalizes the changelog without building, tagging or
/// publishing. Its output is meant to be committed for a later CI release.
pub struct PrepareOperation {
    providers: Providers,
    reporter: Arc<dyn Reporter>,
    release_date: NaiveDate,
}

impl PrepareOperation {
    #[must_use]
    pub fn new(providers: Providers, reporter: Arc<dyn Reporter>, release_date: NaiveDate) -> Self {
        Self {
            providers,
            reporter,
            release_date,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the project cannot be discovered, the working tree
    /// cannot be inspected, or a step fails (`OperationError::ReleaseFailed`).
    pub fn execute(&self, start_path: &Path, input: &PrepareInput) -> Result<PrepareOutcome> {
        let project = self.providers.project.discover_project(start_path)?;

        let pending = self.providers.git.dirty_paths(&project.root)?;
        if pending.is_empty() {
            self.reporter
                .info("working tree is clean; nothing to prepare");
            return Ok(PrepareOutcome::NothingToDo);
        }

        let ctx = ReleaseContext::new(
            project,
            self.providers.clone(),
            Arc::clone(&self.reporter),
            input.dry_run,
            self.release_date,
        );
        let state = ReleaseState::new(ReleaseMode::Prepare, input.requested, input.dry_run);
        let output = run_pipeline(&ctx, release_pipeline(ReleaseMode::Prepare), state)?;

        let new_version = output
            .state
            .new_version
            .clone()
            .ok_or(OperationError::MissingReleaseVersion)?;
        let previous = output
            .state
            .previous_version
            .clone()
            .unwrap_or_else(|| new_version.clone());

        Ok(PrepareOutcome::Prepared {
            next_tag: tag_name(&ctx.config().tag_prefix, &new_version),
            previous,
            new_version,
            output: Box::new(output),
        })
    }
}
