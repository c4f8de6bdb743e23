mod bump;
mod guard;
mod history;
mod prepare;
mod publish;
mod release;
mod resolve;
mod version_store;

pub use bump::{BumpInput, BumpOperation, BumpOutput};
pub use guard::ReleaseGuard;
pub use history::{
    HistoryShowOperation, HistoryView, RecordSyncOperation, SyncInput, SyncOutput,
};
pub use prepare::{PrepareInput, PrepareOperation, PrepareOutcome};
pub use publish::{PublishAction, PublishInput, PublishOperation, PublishOutput, parse_release_tag};
pub use release::{
    ReleaseContext, ReleaseData, ReleaseInput, ReleaseOperation, ReleaseOutput, ReleasePipeline,
    recovery_guide, release_pipeline,
};
pub use resolve::{DecisionMode, ReleaseDecision, decide_from_entry, resolve_release_type};
pub use version_store::{VersionInfo, VersionStore};
