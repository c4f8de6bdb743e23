use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{TimeZone, Utc};
use iconship_changelog::{Changelog, ChangelogError};
use iconship_core::{ManifestVersion, PackageInfo};
use iconship_git::{CommitInfo, HeadState, TagInfo};
use iconship_history::{DEFAULT_HISTORY_LIMIT, HistoryEntry, HistoryError, HistoryLedger, SaveReport};
use iconship_manifest::ManifestError;
use iconship_pipeline::StepProgress;
use iconship_project::{IconProject, ReleaseConfig};

use crate::providers::Providers;
use crate::traits::{
    ChangelogIO, CommandOutput, CommandRunner, CommandSpec, GitProvider, HistoryIO,
    HostedRelease, HostingProvider, ManifestStore, ProjectProvider, RegistryProvider, Reporter,
};
use crate::{OperationError, Result};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub const MOCK_ROOT: &str = "/mock/icons";
pub const MOCK_REPOSITORY: &str = "git+https://github.com/acme/icons.git";

/// An in-memory project layout with the version each manifest starts at.
#[derive(Debug, Clone)]
pub struct MockProject {
    pub project: IconProject,
    pub versions: Vec<(PathBuf, Option<ManifestVersion>)>,
    pub repository_url: Option<String>,
}

/// Packages `@acme/icons-<dir>` under `/mock/icons/packages/<dir>`.
pub fn mock_project(packages: &[(&str, &str)]) -> MockProject {
    let mut mock = MockProject {
        project: IconProject {
            root: PathBuf::from(MOCK_ROOT),
            config: ReleaseConfig::default(),
            manifests: Vec::new(),
            packages: Vec::new(),
        },
        versions: Vec::new(),
        repository_url: Some(MOCK_REPOSITORY.to_string()),
    };
    for (dir, version) in packages {
        mock = mock.with_package(dir, &format!("@acme/icons-{dir}"), version);
    }
    mock
}

impl MockProject {
    pub fn with_package(mut self, dir: &str, name: &str, version: &str) -> Self {
        let path = self.project.root.join("packages").join(dir).join("package.json");
        let version = ManifestVersion::parse(version).expect("valid mock version");
        self.project.manifests.push(path.clone());
        self.project.packages.push(PackageInfo {
            name: name.to_string(),
            manifest_path: path.clone(),
            private: false,
        });
        self.versions.push((path, Some(version)));
        self
    }

    /// A manifest with no `version` field.
    pub fn with_unversioned(mut self, dir: &str) -> Self {
        let path = self.project.root.join("packages").join(dir).join("package.json");
        self.project.manifests.push(path.clone());
        self.versions.push((path, None));
        self
    }

    pub fn without_repository(mut self) -> Self {
        self.repository_url = None;
        self
    }

    pub fn with_config(mut self, configure: impl FnOnce(&mut ReleaseConfig)) -> Self {
        configure(&mut self.project.config);
        self
    }
}

pub struct MockProjectProvider {
    project: MockProject,
}

impl ProjectProvider for MockProjectProvider {
    fn discover_project(&self, _start_path: &Path) -> Result<IconProject> {
        Ok(self.project.project.clone())
    }

    fn repository_url(&self, _project: &IconProject) -> Result<Option<String>> {
        Ok(self.project.repository_url.clone())
    }
}

pub struct MockManifestStore {
    versions: Mutex<HashMap<PathBuf, Option<ManifestVersion>>>,
}

impl MockManifestStore {
    pub fn from_project(project: &MockProject) -> Self {
        Self {
            versions: Mutex::new(project.versions.iter().cloned().collect()),
        }
    }

    pub fn version_at(&self, path: &Path) -> Option<ManifestVersion> {
        lock(&self.versions).get(path).cloned().flatten()
    }
}

impl ManifestStore for MockManifestStore {
    fn read_version(&self, manifest_path: &Path) -> Result<Option<ManifestVersion>> {
        lock(&self.versions)
            .get(manifest_path)
            .cloned()
            .ok_or_else(|| {
                ManifestError::Read {
                    path: manifest_path.to_path_buf(),
                    source: std::io::ErrorKind::NotFound.into(),
                }
                .into()
            })
    }

    fn write_version(&self, manifest_path: &Path, version: &ManifestVersion) -> Result<()> {
        lock(&self.versions).insert(manifest_path.to_path_buf(), Some(version.clone()));
        Ok(())
    }

    fn verify_version(&self, manifest_path: &Path, expected: &ManifestVersion) -> Result<()> {
        match self.version_at(manifest_path) {
            Some(actual) if &actual == expected => Ok(()),
            actual => Err(ManifestError::VerificationFailed {
                path: manifest_path.to_path_buf(),
                expected: expected.to_string(),
                actual: actual.map(|v| v.to_string()).unwrap_or_default(),
            }
            .into()),
        }
    }
}

#[derive(Default)]
pub struct MockHistoryIO {
    ledger: Mutex<Option<HistoryLedger>>,
    saves: Mutex<usize>,
}

impl MockHistoryIO {
    /// No ledger file.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger holding `entries`, newest first.
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        let mut ledger = HistoryLedger::new();
        for entry in entries.into_iter().rev() {
            ledger.prepend(entry, DEFAULT_HISTORY_LIMIT);
        }
        Self {
            ledger: Mutex::new(Some(ledger)),
            saves: Mutex::new(0),
        }
    }

    pub fn ledger(&self) -> Option<HistoryLedger> {
        lock(&self.ledger).clone()
    }

    pub fn latest_package_version(&self) -> Option<String> {
        self.ledger()?.latest()?.package_version.clone()
    }

    pub fn saves(&self) -> usize {
        *lock(&self.saves)
    }
}

impl HistoryIO for MockHistoryIO {
    fn load(&self, _project: &IconProject) -> Result<Option<HistoryLedger>> {
        Ok(self.ledger())
    }

    fn load_latest(&self, project: &IconProject) -> Result<HistoryEntry> {
        let ledger = self.ledger().ok_or_else(|| HistoryError::NotFound {
            path: project.history_path(),
        })?;
        let entry = ledger.latest().cloned().ok_or_else(|| HistoryError::Empty {
            path: project.history_path(),
        })?;
        Ok(entry)
    }

    fn append(
        &self,
        project: &IconProject,
        entry: HistoryEntry,
        limit: usize,
    ) -> Result<SaveReport> {
        if !entry.has_changes() {
            return Ok(SaveReport::default());
        }
        let mut ledger = self.ledger().unwrap_or_default();
        ledger.prepend(entry, limit);
        self.save(project, &ledger)
    }

    fn save(&self, _project: &IconProject, ledger: &HistoryLedger) -> Result<SaveReport> {
        *lock(&self.ledger) = Some(ledger.clone());
        *lock(&self.saves) += 1;
        Ok(SaveReport {
            written: true,
            mirror_error: None,
        })
    }
}

#[derive(Default)]
pub struct MockChangelogIO {
    content: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MockChangelogIO {
    pub fn with_content(content: &str) -> Self {
        Self {
            content: Mutex::new(Some(content.to_string())),
            writes: Mutex::new(0),
        }
    }

    pub fn content(&self) -> Option<String> {
        lock(&self.content).clone()
    }

    pub fn writes(&self) -> usize {
        *lock(&self.writes)
    }
}

impl ChangelogIO for MockChangelogIO {
    fn read(&self, path: &Path) -> Result<Changelog> {
        let content = self.content().ok_or_else(|| ChangelogError::Read {
            path: path.to_path_buf(),
            source: std::io::ErrorKind::NotFound.into(),
        })?;
        Ok(Changelog::parse(content, path))
    }

    fn write(&self, changelog: &Changelog) -> Result<()> {
        *lock(&self.content) = Some(changelog.content().to_string());
        *lock(&self.writes) += 1;
        Ok(())
    }
}

pub struct MockGitProvider {
    head: HeadState,
    dirty: Vec<String>,
    remote_url: Option<String>,
    local_tags: Mutex<HashSet<String>>,
    remote_tags: HashSet<String>,
    fail_push: Option<String>,
    staged: Mutex<usize>,
    commits: Mutex<Vec<String>>,
    tags: Mutex<Vec<String>>,
    pushes: Mutex<Vec<(String, String)>>,
}

impl Default for MockGitProvider {
    fn default() -> Self {
        Self {
            head: HeadState::Branch("main".to_string()),
            dirty: Vec::new(),
            remote_url: None,
            local_tags: Mutex::default(),
            remote_tags: HashSet::new(),
            fail_push: None,
            staged: Mutex::new(0),
            commits: Mutex::default(),
            tags: Mutex::default(),
            pushes: Mutex::default(),
        }
    }
}

impl MockGitProvider {
    /// Clean checkout of `main`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_branch(mut self, branch: &str) -> Self {
        self.head = HeadState::Branch(branch.to_string());
        self
    }

    pub fn detached(mut self) -> Self {
        self.head = HeadState::Detached;
        self
    }

    pub fn with_dirty(mut self, paths: &[&str]) -> Self {
        self.dirty = paths.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_remote_url(mut self, url: &str) -> Self {
        self.remote_url = Some(url.to_string());
        self
    }

    pub fn with_local_tag(self, tag: &str) -> Self {
        lock(&self.local_tags).insert(tag.to_string());
        self
    }

    pub fn with_remote_tag(mut self, tag: &str) -> Self {
        self.remote_tags.insert(tag.to_string());
        self
    }

    /// Rejects pushes of `refspec`.
    pub fn failing_push(mut self, refspec: &str) -> Self {
        self.fail_push = Some(refspec.to_string());
        self
    }

    pub fn staged(&self) -> usize {
        *lock(&self.staged)
    }

    pub fn commits(&self) -> Vec<String> {
        lock(&self.commits).clone()
    }

    pub fn tags(&self) -> Vec<String> {
        lock(&self.tags).clone()
    }

    pub fn pushes(&self) -> Vec<(String, String)> {
        lock(&self.pushes).clone()
    }
}

impl GitProvider for MockGitProvider {
    fn head_state(&self, _project_root: &Path) -> Result<HeadState> {
        Ok(self.head.clone())
    }

    fn dirty_paths(&self, _project_root: &Path) -> Result<Vec<String>> {
        Ok(self.dirty.clone())
    }

    fn local_tag_exists(&self, _project_root: &Path, tag: &str) -> Result<bool> {
        Ok(lock(&self.local_tags).contains(tag))
    }

    fn remote_tag_exists(&self, _project_root: &Path, _remote: &str, tag: &str) -> Result<bool> {
        Ok(self.remote_tags.contains(tag))
    }

    fn stage_all(&self, _project_root: &Path) -> Result<()> {
        *lock(&self.staged) += 1;
        Ok(())
    }

    fn commit(&self, _project_root: &Path, message: &str) -> Result<CommitInfo> {
        let mut commits = lock(&self.commits);
        commits.push(message.to_string());
        Ok(CommitInfo {
            sha: format!("{:040x}", commits.len()),
            message: message.to_string(),
        })
    }

    fn create_tag(&self, _project_root: &Path, tag: &str) -> Result<TagInfo> {
        lock(&self.local_tags).insert(tag.to_string());
        lock(&self.tags).push(tag.to_string());
        Ok(TagInfo {
            name: tag.to_string(),
            target_sha: format!("{:040x}", 1),
        })
    }

    fn push(&self, _project_root: &Path, remote: &str, refspec: &str) -> Result<()> {
        if self.fail_push.as_deref() == Some(refspec) {
            return Err(OperationError::CommandFailed {
                step: "push".to_string(),
                command: format!("git push {remote} {refspec}"),
                output: "remote rejected".to_string(),
            });
        }
        lock(&self.pushes).push((remote.to_string(), refspec.to_string()));
        Ok(())
    }

    fn remote_url(&self, _project_root: &Path, _remote: &str) -> Result<Option<String>> {
        Ok(self.remote_url.clone())
    }
}

/// Hosted release record: tag plus the notes read from the notes file.
pub type RecordedRelease = (String, String);

pub struct MockHostingProvider {
    authenticated: bool,
    existing: HashSet<String>,
    created: Mutex<Vec<RecordedRelease>>,
    edited: Mutex<Vec<RecordedRelease>>,
}

impl Default for MockHostingProvider {
    fn default() -> Self {
        Self {
            authenticated: true,
            existing: HashSet::new(),
            created: Mutex::default(),
            edited: Mutex::default(),
        }
    }
}

impl MockHostingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release(mut self, tag: &str) -> Self {
        self.existing.insert(tag.to_string());
        self
    }

    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn created(&self) -> Vec<RecordedRelease> {
        lock(&self.created).clone()
    }

    pub fn edited(&self) -> Vec<RecordedRelease> {
        lock(&self.edited).clone()
    }

    fn record(list: &Mutex<Vec<RecordedRelease>>, release: &HostedRelease) {
        let notes = std::fs::read_to_string(&release.notes_file).unwrap_or_default();
        lock(list).push((release.tag.clone(), notes));
    }
}

impl HostingProvider for MockHostingProvider {
    fn auth_status(&self, _project_root: &Path) -> Result<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(OperationError::CommandFailed {
                step: "preflight".to_string(),
                command: "gh auth status".to_string(),
                output: "You are not logged into any GitHub hosts".to_string(),
            })
        }
    }

    fn release_exists(&self, _project_root: &Path, tag: &str) -> Result<bool> {
        Ok(self.existing.contains(tag))
    }

    fn create_release(&self, _project_root: &Path, release: &HostedRelease) -> Result<()> {
        Self::record(&self.created, release);
        Ok(())
    }

    fn edit_release(&self, _project_root: &Path, release: &HostedRelease) -> Result<()> {
        Self::record(&self.edited, release);
        Ok(())
    }

    fn create_command(&self, release: &HostedRelease) -> String {
        format!(
            "gh release create {} --title {} --notes-file {}",
            release.tag,
            release.title,
            release.notes_file.display()
        )
    }
}

#[derive(Default)]
pub struct MockRegistryProvider {
    published: HashMap<String, String>,
    failures: HashSet<String>,
}

impl MockRegistryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_published(mut self, package: &str, version: &str) -> Self {
        self.published.insert(package.to_string(), version.to_string());
        self
    }

    pub fn with_query_failure(mut self, package: &str) -> Self {
        self.failures.insert(package.to_string());
        self
    }
}

impl RegistryProvider for MockRegistryProvider {
    fn whoami(&self, _project_root: &Path) -> Result<String> {
        Ok("release-bot".to_string())
    }

    fn published_version(&self, _project_root: &Path, package: &str) -> Result<Option<String>> {
        if self.failures.contains(package) {
            return Err(OperationError::RegistryQueryFailed {
                package: package.to_string(),
                output: "npm ERR! code ETIMEDOUT".to_string(),
            });
        }
        Ok(self.published.get(package).cloned())
    }
}

/// Answers commands by longest matching command-line prefix; anything
/// unmatched succeeds silently.
#[derive(Default)]
pub struct MockCommandRunner {
    outputs: Vec<(String, CommandOutput)>,
    missing_tools: HashSet<String>,
    commands: Mutex<Vec<String>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, prefix: &str, output: CommandOutput) -> Self {
        self.outputs.push((prefix.to_string(), output));
        self
    }

    pub fn failing(self, prefix: &str, stderr: &str) -> Self {
        self.with_output(prefix, CommandOutput {
            code: Some(1),
            stderr: stderr.to_string(),
            ..CommandOutput::default()
        })
    }

    pub fn without_tool(mut self, name: &str) -> Self {
        self.missing_tools.insert(name.to_string());
        self
    }

    /// Every command line run so far.
    pub fn commands(&self) -> Vec<String> {
        lock(&self.commands).clone()
    }
}

impl CommandRunner for MockCommandRunner {
    fn tool_exists(&self, name: &str) -> bool {
        !self.missing_tools.contains(name)
    }

    fn run(&self, _step: &str, spec: &CommandSpec) -> Result<CommandOutput> {
        let line = spec.to_string();
        lock(&self.commands).push(line.clone());

        let output = self
            .outputs
            .iter()
            .filter(|(prefix, _)| line.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or_else(
                || CommandOutput {
                    code: Some(0),
                    ..CommandOutput::default()
                },
                |(_, output)| output.clone(),
            );
        Ok(output)
    }
}

/// Captures reporter output as plain lines.
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    pub fn dry_run_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.starts_with("[dry-run] "))
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn step_started(&self, progress: StepProgress<'_>) {
        lock(&self.lines).push(progress.to_string());
    }

    fn info(&self, message: &str) {
        lock(&self.lines).push(message.to_string());
    }

    fn dry_run(&self, action: &str) {
        lock(&self.lines).push(format!("[dry-run] {action}"));
    }
}

/// A history entry recorded against `version` adding `added`.
pub fn history_entry(version: &str, added: &[&str]) -> HistoryEntry {
    let timestamp = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    let mut entry = HistoryEntry::new(timestamp);
    entry.package_version = Some(version.to_string());
    entry.added = added.iter().map(|name| (*name).into()).collect();
    entry
}

pub const EMPTY_CHANGELOG: &str = "# Changelog\n\n## [Unreleased]\n\n### Added\n\n- home icon\n";

/// Every collaborator of an operation, in memory.
pub struct MockWorld {
    pub project: MockProject,
    pub manifests: Arc<MockManifestStore>,
    pub history: Arc<MockHistoryIO>,
    pub changelog: Arc<MockChangelogIO>,
    pub git: Arc<MockGitProvider>,
    pub hosting: Arc<MockHostingProvider>,
    pub registry: Arc<MockRegistryProvider>,
    pub runner: Arc<MockCommandRunner>,
    pub reporter: Arc<RecordingReporter>,
}

impl MockWorld {
    pub fn new(project: MockProject) -> Self {
        Self {
            manifests: Arc::new(MockManifestStore::from_project(&project)),
            project,
            history: Arc::new(MockHistoryIO::new()),
            changelog: Arc::new(MockChangelogIO::with_content(EMPTY_CHANGELOG)),
            git: Arc::new(MockGitProvider::new()),
            hosting: Arc::new(MockHostingProvider::new()),
            registry: Arc::new(MockRegistryProvider::new()),
            runner: Arc::new(MockCommandRunner::new()),
            reporter: Arc::new(RecordingReporter::new()),
        }
    }

    pub fn with_history(mut self, entries: Vec<HistoryEntry>) -> Self {
        self.history = Arc::new(MockHistoryIO::with_entries(entries));
        self
    }

    pub fn with_changelog(mut self, content: &str) -> Self {
        self.changelog = Arc::new(MockChangelogIO::with_content(content));
        self
    }

    pub fn with_git(mut self, git: MockGitProvider) -> Self {
        self.git = Arc::new(git);
        self
    }

    pub fn with_hosting(mut self, hosting: MockHostingProvider) -> Self {
        self.hosting = Arc::new(hosting);
        self
    }

    pub fn with_registry(mut self, registry: MockRegistryProvider) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_runner(mut self, runner: MockCommandRunner) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    pub fn providers(&self) -> Providers {
        Providers {
            project: Arc::new(MockProjectProvider {
                project: self.project.clone(),
            }),
            manifests: self.manifests.clone(),
            history: self.history.clone(),
            changelog: self.changelog.clone(),
            git: self.git.clone(),
            hosting: self.hosting.clone(),
            registry: self.registry.clone(),
            runner: self.runner.clone(),
        }
    }

    pub fn reporter(&self) -> Arc<dyn Reporter> {
        self.reporter.clone()
    }

    pub fn manifest_versions(&self) -> Vec<String> {
        self.project
            .project
            .manifests
            .iter()
            .filter_map(|p| self.manifests.version_at(p))
            .map(|v| v.to_string())
            .collect()
    }
}
