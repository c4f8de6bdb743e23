mod context;
mod data;
mod operation;
mod recovery;
mod steps;

pub use context::ReleaseContext;
pub use data::ReleaseData;
pub(crate) use operation::run_pipeline;
pub use operation::{ReleaseInput, ReleaseOperation, ReleaseOutput, ReleasePipeline, release_pipeline};
pub use recovery::recovery_guide;
pub(crate) use steps::{configured_command, write_notes_file};
