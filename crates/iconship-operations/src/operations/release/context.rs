use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use iconship_project::{IconProject, ReleaseConfig};

use crate::Result;
use crate::providers::Providers;
use crate::traits::{CommandOutput, CommandSpec, Reporter};

/// Shared, read-only dependencies of a release run.
pub struct ReleaseContext {
    project: IconProject,
    providers: Providers,
    reporter: Arc<dyn Reporter>,
    dry_run: bool,
    release_date: NaiveDate,
    ci_ref_name: Option<String>,
}

impl ReleaseContext {
    #[must_use]
    pub fn new(
        project: IconProject,
        providers: Providers,
        reporter: Arc<dyn Reporter>,
        dry_run: bool,
        release_date: NaiveDate,
    ) -> Self {
        Self {
            project,
            providers,
            reporter,
            dry_run,
            release_date,
            ci_ref_name: None,
        }
    }

    /// Branch or tag that triggered a CI run (`GITHUB_REF_NAME`).
    #[must_use]
    pub fn with_ci_ref_name(mut self, ref_name: Option<String>) -> Self {
        self.ci_ref_name = ref_name;
        self
    }

    #[must_use]
    pub fn project(&self) -> &IconProject {
        &self.project
    }

    #[must_use]
    pub fn config(&self) -> &ReleaseConfig {
        &self.project.config
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.project.root
    }

    #[must_use]
    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    #[must_use]
    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    #[must_use]
    pub fn ci_ref_name(&self) -> Option<&str> {
        self.ci_ref_name.as_deref()
    }

    /// Runs `action`, or only reports `description` in a dry run.
    pub(crate) fn mutate<T: Default>(
        &self,
        description: &str,
        action: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        if self.dry_run {
            self.reporter.dry_run(description);
            return Ok(T::default());
        }
        action()
    }

    /// Runs a configured command with its output passed through, or reports
    /// it in a dry run.
    pub(crate) fn run_command(&self, step: &str, spec: &CommandSpec) -> Result<CommandOutput> {
        let spec = spec.clone().inherit_output();
        self.mutate(&spec.to_string(), || {
            self.providers.runner.run_checked(step, &spec)
        })
    }
}
