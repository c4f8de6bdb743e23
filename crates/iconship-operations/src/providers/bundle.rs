use std::sync::Arc;

use super::{
    FileSystemChangelogIO, FileSystemHistoryIO, FileSystemManifestStore,
    FileSystemProjectProvider, GhCliProvider, Git2Provider, NpmCliProvider, ProcessRunner,
};
use crate::traits::{
    ChangelogIO, CommandRunner, GitProvider, HistoryIO, HostingProvider, ManifestStore,
    ProjectProvider, RegistryProvider,
};

/// Every external collaborator an operation may touch.
#[derive(Clone)]
pub struct Providers {
    pub project: Arc<dyn ProjectProvider>,
    pub manifests: Arc<dyn ManifestStore>,
    pub history: Arc<dyn HistoryIO>,
    pub changelog: Arc<dyn ChangelogIO>,
    pub git: Arc<dyn GitProvider>,
    pub hosting: Arc<dyn HostingProvider>,
    pub registry: Arc<dyn RegistryProvider>,
    pub runner: Arc<dyn CommandRunner>,
}

impl Providers {
    /// Filesystem, `git2`, `git`, `gh` and `npm` backed providers sharing
    /// one process runner.
    #[must_use]
    pub fn system() -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());
        Self {
            project: Arc::new(FileSystemProjectProvider::new()),
            manifests: Arc::new(FileSystemManifestStore::new()),
            history: Arc::new(FileSystemHistoryIO::new()),
            changelog: Arc::new(FileSystemChangelogIO::new()),
            git: Arc::new(Git2Provider::new(Arc::clone(&runner))),
            hosting: Arc::new(GhCliProvider::new(Arc::clone(&runner))),
            registry: Arc::new(NpmCliProvider::new(Arc::clone(&runner))),
            runner,
        }
    }
}
