use std::fmt::Debug;

use tracing::{debug, info};

use crate::audit::PipelineAuditLog;
use crate::error::PipelineError;
use crate::progress::{ProgressSink, StepProgress};
use crate::step::PipelineStep;

pub(crate) type BoxedStep<Ctx, Data, Err> =
    Box<dyn PipelineStep<Context = Ctx, Data = Data, Error = Err>>;

/// An ordered list of steps ready to run.
pub struct Pipeline<Ctx, Data, Err> {
    steps: Vec<BoxedStep<Ctx, Data, Err>>,
}

impl<Ctx, Data, Err: Debug> Pipeline<Ctx, Data, Err> {
    pub(crate) fn from_steps(steps: Vec<BoxedStep<Ctx, Data, Err>>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// # Errors
    ///
    /// Returns `PipelineError::StepFailed` for the first step that fails.
    pub fn execute(
        &self,
        ctx: &Ctx,
        data: &mut Data,
        progress: &dyn ProgressSink,
    ) -> Result<(), PipelineError<Err>> {
        self.execute_with_audit(ctx, data, progress).0
    }

    /// Runs every step in order and returns the outcome with the audit log.
    pub fn execute_with_audit(
        &self,
        ctx: &Ctx,
        data: &mut Data,
        progress: &dyn ProgressSink,
    ) -> (Result<(), PipelineError<Err>>, PipelineAuditLog) {
        let mut audit_log = PipelineAuditLog::new();
        let total = self.steps.len();

        for (position, step) in self.steps.iter().enumerate() {
            let index = position + 1;
            let title = step.title();
            progress.step_started(StepProgress {
                index,
                total,
                title: &title,
            });
            audit_log.record_start(step.name());
            debug!(step = step.name(), index, total, "running step");

            if let Err(source) = step.execute(ctx, data) {
                audit_log.record_failure();
                for remaining in &self.steps[index..] {
                    audit_log.record_not_run(remaining.name());
                }
                info!(step = step.name(), "step failed, stopping pipeline");
                return (
                    Err(PipelineError::StepFailed {
                        step: step.name().to_string(),
                        index,
                        source,
                    }),
                    audit_log,
                );
            }

            audit_log.record_success();
        }

        (Ok(()), audit_log)
    }
}
