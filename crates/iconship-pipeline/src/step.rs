/// One stage of a pipeline.
///
/// Steps share a read-only context (providers, configuration) and mutate the
/// run data, which carries results forward to later steps.
pub trait PipelineStep: Send + Sync {
    /// Shared dependencies.
    type Context;

    /// Per-run state threaded through every step.
    type Data;

    type Error;

    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Operator-facing description, shown in progress output.
    fn title(&self) -> String {
        self.name().to_string()
    }

    /// # Errors
    ///
    /// Returns an error if the step cannot complete. Later steps do not run.
    fn execute(&self, ctx: &Self::Context, data: &mut Self::Data) -> Result<(), Self::Error>;
}
