use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use iconship_core::ReleaseType;
use iconship_git::CommitInfo;
use iconship_pipeline::{Pipeline, PipelineBuilder};
use tracing::info;

use super::context::ReleaseContext;
use super::data::ReleaseData;
use super::recovery::recovery_guide;
use super::steps::{
    BuildStep, BumpVersionsStep, CommitStep, FinalizeChangelogStep, GuardStep,
    HostedReleaseAndPublishStep, LoadPreparedVersionStep, PreflightStep, ResolveReleaseTypeStep,
    TagAndPushStep,
};
use crate::providers::Providers;
use crate::traits::{Reporter, ReporterProgress};
use crate::types::{ReleaseMode, ReleaseState};
use crate::{OperationError, Result};

pub type ReleasePipeline = Pipeline<ReleaseContext, ReleaseData, OperationError>;

/// Ordered steps for `mode`.
#[must_use]
pub fn release_pipeline(mode: ReleaseMode) -> ReleasePipeline {
    let builder = PipelineBuilder::new();
    match mode {
        ReleaseMode::Local => builder
            .step(PreflightStep::new(mode))
            .step(ResolveReleaseTypeStep)
            .step(BumpVersionsStep)
            .step(FinalizeChangelogStep)
            .step(BuildStep::new())
            .step(CommitStep)
            .step(GuardStep)
            .step(TagAndPushStep::with_branch())
            .step(HostedReleaseAndPublishStep),
        ReleaseMode::Ci => builder
            .step(PreflightStep::new(mode))
            .step(LoadPreparedVersionStep)
            .step(BuildStep::new().require_clean_after())
            .step(GuardStep)
            .step(TagAndPushStep::tag_only())
            .step(HostedReleaseAndPublishStep),
        ReleaseMode::Prepare => builder
            .step(ResolveReleaseTypeStep)
            .step(BumpVersionsStep)
            .step(FinalizeChangelogStep),
    }
    .build()
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseInput {
    pub mode: ReleaseMode,
    pub requested: ReleaseType,
    pub dry_run: bool,
    /// `GITHUB_REF_NAME` of a CI run.
    pub ci_ref_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReleaseOutput {
    pub state: ReleaseState,
    pub notes: Option<String>,
    pub commit: Option<CommitInfo>,
    pub tag: Option<String>,
    pub manifests_written: usize,
    pub history_entries_marked: usize,
    /// One line per step with its outcome.
    pub audit: String,
}

/// Drives a release through its mode's pipeline.
///
/// A failing step leaves completed side effects in place and surfaces as
/// `OperationError::ReleaseFailed` with a recovery guide.
pub struct ReleaseOperation {
    providers: Providers,
    reporter: Arc<dyn Reporter>,
    release_date: NaiveDate,
}

impl ReleaseOperation {
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
    /// Returns `OperationError::TypeWithCi` for an explicit type in CI mode,
    /// a discovery error, or `OperationError::ReleaseFailed` wrapping the
    /// first failing step.
    pub fn execute(&self, start_path: &Path, input: &ReleaseInput) -> Result<ReleaseOutput> {
        if input.mode == ReleaseMode::Ci && input.requested != ReleaseType::Auto {
            return Err(OperationError::TypeWithCi);
        }

        let project = self.providers.project.discover_project(start_path)?;
        let ctx = ReleaseContext::new(
            project,
            self.providers.clone(),
            Arc::clone(&self.reporter),
            input.dry_run,
            self.release_date,
        )
        .with_ci_ref_name(input.ci_ref_name.clone());

        let state = ReleaseState::new(input.mode, input.requested, input.dry_run);
        run_pipeline(&ctx, release_pipeline(input.mode), state)
    }
}

pub(crate) fn run_pipeline(
    ctx: &ReleaseContext,
    pipeline: ReleasePipeline,
    state: ReleaseState,
) -> Result<ReleaseOutput> {
    let mode = state.mode;
    let mut data = ReleaseData::new(state);
    info!(%mode, dry_run = ctx.is_dry_run(), steps = pipeline.len(), "starting release");

    let progress = ReporterProgress(ctx.reporter());
    let (result, audit) = pipeline.execute_with_audit(ctx, &mut data, &progress);
    info!(audit = %audit.summary(), "release pipeline finished");

    if let Err(err) = result {
        let recovery = recovery_guide(&data.state, ctx.config());
        return Err(OperationError::from_pipeline(err, data.state, recovery));
    }

    Ok(ReleaseOutput {
        state: data.state,
        notes: data.notes,
        commit: data.commit,
        tag: data.tag,
        manifests_written: data.manifests_written,
        history_entries_marked: data.history_entries_marked,
        audit: audit.summary(),
    })
}
