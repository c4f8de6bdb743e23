use std::io::Write;
use std::path::PathBuf;

use iconship_changelog::{FinalizeRequest, RepositoryInfo};
use iconship_core::tag_name;
use iconship_git::HeadState;
use iconship_manifest::ManifestError;
use iconship_pipeline::PipelineStep;
use semver::Version;
use tempfile::NamedTempFile;
use tracing::debug;

use super::context::ReleaseContext;
use super::data::ReleaseData;
use crate::operations::bump::apply_release_version;
use crate::operations::guard::ReleaseGuard;
use crate::operations::resolve::resolve_release_type;
use crate::operations::version_store::VersionStore;
use crate::traits::{CommandSpec, HostedRelease};
use crate::types::ReleaseMode;
use crate::{OperationError, Result};

const NOTES_FILE_PLACEHOLDER: &str = "<notes-file>";

/// Writes release notes to a temporary file for the hosting CLI.
pub(crate) fn write_notes_file(notes: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("iconship-release-")
        .suffix(".md")
        .tempfile()
        .map_err(OperationError::NotesFile)?;
    writeln!(file, "{notes}").map_err(OperationError::NotesFile)?;
    file.flush().map_err(OperationError::NotesFile)?;
    Ok(file)
}

pub(crate) fn configured_command(
    argv: &[String],
    ctx: &ReleaseContext,
    name: &'static str,
) -> Result<CommandSpec> {
    CommandSpec::from_argv(argv, ctx.root()).ok_or(OperationError::EmptyCommand { name })
}

/// Repository web location for changelog links: the root manifest's
/// `repository` field, else the configured git remote.
pub(crate) fn repository_info(ctx: &ReleaseContext) -> Result<RepositoryInfo> {
    let providers = ctx.providers();
    let url = match providers.project.repository_url(ctx.project())? {
        Some(url) => url,
        None => providers
            .git
            .remote_url(ctx.root(), &ctx.config().remote)?
            .ok_or(OperationError::MissingRepository)?,
    };
    Ok(RepositoryInfo::from_package_repository(&url)?)
}

pub struct PreflightStep {
    mode: ReleaseMode,
}

impl PreflightStep {
    #[must_use]
    pub fn new(mode: ReleaseMode) -> Self {
        Self { mode }
    }

    fn check_tools(ctx: &ReleaseContext) -> Result<()> {
        let runner = &ctx.providers().runner;
        let missing: Vec<String> = ctx
            .config()
            .required_tools
            .iter()
            .filter(|tool| !runner.tool_exists(tool))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(OperationError::MissingTools { names: missing })
        }
    }

    fn check_branch(&self, ctx: &ReleaseContext) -> Result<()> {
        let expected = &ctx.config().main_branch;
        match ctx.providers().git.head_state(ctx.root())? {
            HeadState::Branch(branch) if &branch == expected => Ok(()),
            HeadState::Branch(actual) => Err(OperationError::WrongBranch {
                expected: expected.clone(),
                actual,
            }),
            HeadState::Detached if self.mode == ReleaseMode::Ci => {
                match ctx.ci_ref_name().map(str::trim).filter(|r| !r.is_empty()) {
                    Some(actual) if actual != expected => Err(OperationError::WrongRefName {
                        expected: expected.clone(),
                        actual: actual.to_string(),
                    }),
                    _ => Ok(()),
                }
            }
            HeadState::Detached => Err(OperationError::DetachedHead {
                expected: expected.clone(),
            }),
        }
    }

    fn check_auth(ctx: &ReleaseContext) -> Result<()> {
        let providers = ctx.providers();
        providers.hosting.auth_status(ctx.root())?;
        let user = providers.registry.whoami(ctx.root())?;
        debug!(%user, "registry session");
        Ok(())
    }
}

impl PipelineStep for PreflightStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "preflight"
    }

    fn title(&self) -> String {
        "Preflight checks".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, _data: &mut ReleaseData) -> Result<()> {
        Self::check_tools(ctx)?;
        self.check_branch(ctx)?;
        if self.mode == ReleaseMode::Local {
            let paths = ctx.providers().git.dirty_paths(ctx.root())?;
            if !paths.is_empty() {
                return Err(OperationError::DirtyWorkingTree { paths });
            }
        }
        Self::check_auth(ctx)?;
        ctx.reporter().info("preflight checks passed");
        Ok(())
    }
}

pub struct ResolveReleaseTypeStep;

impl PipelineStep for ResolveReleaseTypeStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "resolve"
    }

    fn title(&self) -> String {
        "Resolve release type".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let providers = ctx.providers();
        let decision = resolve_release_type(
            data.state.requested,
            ctx.project(),
            providers.history.as_ref(),
        )?;
        ctx.reporter().info(&decision.justification);

        let current = VersionStore::new(ctx.project(), providers.manifests.as_ref()).read_current()?;
        let new_version = current.plan(decision.resolved);
        ctx.reporter()
            .info(&format!("version plan: {} -> {new_version}", current.version));

        data.state.resolved = Some(decision.resolved);
        data.state.previous_version = Some(current.version.numeric().clone());
        data.state.new_version = Some(new_version);
        data.current = Some(current);
        data.decision = Some(decision);
        Ok(())
    }
}

pub struct BumpVersionsStep;

impl PipelineStep for BumpVersionsStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "bump"
    }

    fn title(&self) -> String {
        "Bump package versions".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let version = data.target_version()?;
        let current = data
            .current
            .clone()
            .ok_or(OperationError::MissingReleaseVersion)?;

        let description = format!(
            "write version {version} to {} package manifests",
            ctx.project().manifests.len()
        );
        let applied = ctx.mutate(&description, || {
            apply_release_version(ctx.project(), ctx.providers(), &current, &version)
        })?;

        data.manifests_written = applied.manifests_written;
        data.history_entries_marked = applied.history_entries_marked;
        data.state.version_bumped = true;
        Ok(())
    }
}

pub struct FinalizeChangelogStep;

impl FinalizeChangelogStep {
    /// Newest release already in the changelog below `version`, else the
    /// pre-bump version when it differs.
    fn comparison_base(
        latest_in_changelog: Option<Version>,
        current: Option<&Version>,
        version: &Version,
    ) -> Option<Version> {
        latest_in_changelog
            .filter(|latest| latest < version)
            .or_else(|| current.filter(|c| *c != version).cloned())
    }
}

impl PipelineStep for FinalizeChangelogStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "changelog"
    }

    fn title(&self) -> String {
        "Finalize CHANGELOG".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let version = data.target_version()?;
        let io = &ctx.providers().changelog;
        let mut changelog = io.read(&ctx.project().changelog_path())?;
        let repository = repository_info(ctx)?;

        let previous = Self::comparison_base(
            changelog.latest_released_version(),
            data.state.previous_version.as_ref(),
            &version,
        );
        let request = FinalizeRequest {
            version: &version,
            previous: previous.as_ref(),
            date: ctx.release_date(),
            tag_prefix: &ctx.config().tag_prefix,
            repository: &repository,
        };
        let notes = changelog.finalize_unreleased(&request)?;

        let description = format!(
            "update {} for v{version} ({})",
            ctx.config().changelog.display(),
            ctx.release_date().format("%Y-%m-%d")
        );
        ctx.mutate(&description, || io.write(&changelog))?;

        data.notes = Some(notes);
        data.state.changelog_updated = true;
        Ok(())
    }
}

/// Reads the version a `prepare` run already committed.
pub struct LoadPreparedVersionStep;

impl PipelineStep for LoadPreparedVersionStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "load-version"
    }

    fn title(&self) -> String {
        "Load release version from repository".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let providers = ctx.providers();
        let source = ctx.project().version_source_path();
        let version = providers
            .manifests
            .read_version(&source)?
            .ok_or_else(|| ManifestError::MissingField {
                path: source.clone(),
                field: "version",
            })?
            .into_released();

        let changelog = providers.changelog.read(&ctx.project().changelog_path())?;
        data.notes = Some(changelog.release_notes(&version));

        ctx.reporter()
            .info(&format!("release version from repository: {version}"));
        data.state.previous_version = Some(version.clone());
        data.state.new_version = Some(version);
        Ok(())
    }
}

pub struct BuildStep {
    require_clean_after: bool,
}

impl BuildStep {
    #[must_use]
    pub fn new() -> Self {
        Self {
            require_clean_after: false,
        }
    }

    /// Fails if the build leaves the working tree dirty.
    #[must_use]
    pub fn require_clean_after(mut self) -> Self {
        self.require_clean_after = true;
        self
    }
}

impl Default for BuildStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for BuildStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "build"
    }

    fn title(&self) -> String {
        "Build release artifacts".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let spec = configured_command(&ctx.config().build_command, ctx, "build_command")?;
        ctx.run_command("build", &spec)?;
        data.state.build_completed = true;

        if self.require_clean_after {
            let paths = ctx.providers().git.dirty_paths(ctx.root())?;
            if !paths.is_empty() {
                return Err(OperationError::BuildLeftChanges { paths });
            }
        }
        Ok(())
    }
}

pub struct CommitStep;

impl CommitStep {
    #[must_use]
    pub fn message(tag: &str) -> String {
        format!("release: {tag}")
    }
}

impl PipelineStep for CommitStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "commit"
    }

    fn title(&self) -> String {
        "Commit release changes".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let version = data.target_version()?;
        let git = &ctx.providers().git;
        let message = Self::message(&tag_name(&ctx.config().tag_prefix, &version));

        ctx.mutate("git add -A", || git.stage_all(ctx.root()))?;
        let commit = ctx.mutate(&format!("git commit -m \"{message}\""), || {
            git.commit(ctx.root(), &message).map(Some)
        })?;

        if let Some(commit) = &commit {
            debug!(sha = %commit.sha, "created release commit");
        }
        data.commit = commit;
        data.state.commit_created = true;
        Ok(())
    }
}

pub struct GuardStep;

impl PipelineStep for GuardStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "guards"
    }

    fn title(&self) -> String {
        "Verify duplicate-release guards".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let version = data.target_version()?;
        let providers = ctx.providers();
        ReleaseGuard::new(
            ctx.project(),
            providers.git.as_ref(),
            providers.hosting.as_ref(),
            providers.registry.as_ref(),
        )
        .assert_all(&version)?;
        ctx.reporter().info("tag/release/registry guards passed");
        Ok(())
    }
}

pub struct TagAndPushStep {
    push_branch: bool,
}

impl TagAndPushStep {
    /// Pushes the release commit on the main branch before the tag.
    #[must_use]
    pub fn with_branch() -> Self {
        Self { push_branch: true }
    }

    #[must_use]
    pub fn tag_only() -> Self {
        Self { push_branch: false }
    }
}

impl PipelineStep for TagAndPushStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "tag"
    }

    fn title(&self) -> String {
        "Create and push git tag".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let version = data.target_version()?;
        let config = ctx.config();
        let git = &ctx.providers().git;
        let tag = tag_name(&config.tag_prefix, &version);

        let created = ctx.mutate(&format!("git tag {tag}"), || {
            git.create_tag(ctx.root(), &tag).map(Some)
        })?;
        data.tag = Some(created.map_or_else(|| tag.clone(), |info| info.name));
        data.state.tag_created = true;

        if self.push_branch {
            let branch = &config.main_branch;
            ctx.mutate(&format!("git push {} {branch}", config.remote), || {
                git.push(ctx.root(), &config.remote, branch)
            })?;
        }
        ctx.mutate(&format!("git push {} {tag}", config.remote), || {
            git.push(ctx.root(), &config.remote, &tag)
        })?;
        data.state.pushed = true;
        Ok(())
    }
}

pub struct HostedReleaseAndPublishStep;

impl PipelineStep for HostedReleaseAndPublishStep {
    type Context = ReleaseContext;
    type Data = ReleaseData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "publish"
    }

    fn title(&self) -> String {
        "Create hosted release and publish packages".to_string()
    }

    fn execute(&self, ctx: &ReleaseContext, data: &mut ReleaseData) -> Result<()> {
        let version = data.target_version()?;
        let providers = ctx.providers();
        let tag = tag_name(&ctx.config().tag_prefix, &version);
        let notes = data
            .notes
            .clone()
            .unwrap_or_else(|| format!("Release v{version}"));

        if ctx.is_dry_run() {
            let planned = HostedRelease {
                tag: tag.clone(),
                title: tag,
                notes_file: PathBuf::from(NOTES_FILE_PLACEHOLDER),
            };
            ctx.reporter()
                .dry_run(&providers.hosting.create_command(&planned));
        } else {
            let file = write_notes_file(&notes)?;
            let release = HostedRelease {
                tag: tag.clone(),
                title: tag,
                notes_file: file.path().to_path_buf(),
            };
            providers.hosting.create_release(ctx.root(), &release)?;
            data.notes_file = Some(file);
        }
        data.state.hosted_release_created = true;

        let spec = configured_command(&ctx.config().publish_command, ctx, "publish_command")?;
        ctx.run_command("publish", &spec)?;
        data.state.packages_published = true;
        Ok(())
    }
}
