//! Forward-only step pipeline.
//!
//! Steps run in order against shared, mutable run data. A failing step stops
//! the run; completed steps are never rolled back. The run data records what
//! already happened so the caller can tell an operator how to resume.

mod audit;
mod builder;
mod error;
mod pipeline;
mod progress;
mod step;

pub use audit::{PipelineAuditLog, StepRecord, StepStatus};
pub use builder::PipelineBuilder;
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use progress::{NoProgress, ProgressSink, StepProgress};
pub use step::PipelineStep;
