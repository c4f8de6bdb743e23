mod changelog_io;
mod command_runner;
mod git_provider;
mod history_io;
mod hosting_provider;
mod manifest_store;
mod project_provider;
mod registry_provider;
mod reporter;

pub use changelog_io::ChangelogIO;
pub use command_runner::{CommandOutput, CommandRunner, CommandSpec};
pub use git_provider::GitProvider;
pub use history_io::HistoryIO;
pub use hosting_provider::{HostedRelease, HostingProvider};
pub use manifest_store::ManifestStore;
pub use project_provider::ProjectProvider;
pub use registry_provider::RegistryProvider;
pub(crate) use reporter::ReporterProgress;
pub use reporter::{Reporter, SilentReporter};
