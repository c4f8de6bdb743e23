use iconship_pipeline::{ProgressSink, StepProgress};

/// Operator-facing output of long-running operations.
pub trait Reporter: Send + Sync {
    fn step_started(&self, progress: StepProgress<'_>);

    fn info(&self, message: &str);

    /// A mutation that a dry run skipped.
    fn dry_run(&self, action: &str);
}

/// Lets a [`Reporter`] receive pipeline progress.
pub(crate) struct ReporterProgress<'a>(pub &'a dyn Reporter);

impl ProgressSink for ReporterProgress<'_> {
    fn step_started(&self, progress: StepProgress<'_>) {
        self.0.step_started(progress);
    }
}

/// Discards all output.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn step_started(&self, _progress: StepProgress<'_>) {}

    fn info(&self, _message: &str) {}

    fn dry_run(&self, _action: &str) {}
}
