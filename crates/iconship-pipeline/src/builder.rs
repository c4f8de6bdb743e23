use std::fmt::Debug;

use crate::pipeline::{BoxedStep, Pipeline};
use crate::step::PipelineStep;

/// Collects steps in execution order.
pub struct PipelineBuilder<Ctx, Data, Err> {
    steps: Vec<BoxedStep<Ctx, Data, Err>>,
}

impl<Ctx, Data, Err> Default for PipelineBuilder<Ctx, Data, Err> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<Ctx, Data, Err: Debug> PipelineBuilder<Ctx, Data, Err> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step<S>(mut self, step: S) -> Self
    where
        S: PipelineStep<Context = Ctx, Data = Data, Error = Err> + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Adds `step` only when `include` is true.
    #[must_use]
    pub fn step_if<S>(self, include: bool, step: S) -> Self
    where
        S: PipelineStep<Context = Ctx, Data = Data, Error = Err> + 'static,
    {
        if include { self.step(step) } else { self }
    }

    #[must_use]
    pub fn build(self) -> Pipeline<Ctx, Data, Err> {
        Pipeline::from_steps(self.steps)
    }
}
