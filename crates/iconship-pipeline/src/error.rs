use std::fmt::Debug;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError<E: Debug> {
    #[error("step {index} ('{step}') failed")]
    StepFailed {
        step: String,
        /// One-based position of the failing step.
        index: usize,
        #[source]
        source: E,
    },
}

impl<E: Debug> PipelineError<E> {
    #[must_use]
    pub fn step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } => step,
        }
    }

    #[must_use]
    pub fn into_source(self) -> E {
        match self {
            Self::StepFailed { source, .. } => source,
        }
    }
}
