use iconship_operations::traits::Reporter;
use iconship_pipeline::StepProgress;

/// Prints operator progress to stdout; logs go to stderr separately.
pub(crate) struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn step_started(&self, progress: StepProgress<'_>) {
        println!("{progress}");
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn dry_run(&self, action: &str) {
        println!("[dry-run] {action}");
    }
}
