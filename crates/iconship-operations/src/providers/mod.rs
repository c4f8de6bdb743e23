mod bundle;
mod changelog;
mod gh;
mod git;
mod history;
mod manifest;
mod npm;
mod process;
mod project;

pub use bundle::Providers;
pub use changelog::FileSystemChangelogIO;
pub use gh::GhCliProvider;
pub use git::Git2Provider;
pub use history::FileSystemHistoryIO;
pub use manifest::FileSystemManifestStore;
pub use npm::NpmCliProvider;
pub use process::ProcessRunner;
pub use project::FileSystemProjectProvider;
