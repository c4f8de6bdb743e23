use std::path::PathBuf;

use iconship_pipeline::PipelineError;
use thiserror::Error;

use crate::types::ReleaseState;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] iconship_core::CoreError),

    #[error(transparent)]
    Manifest(#[from] iconship_manifest::ManifestError),

    #[error(transparent)]
    History(#[from] iconship_history::HistoryError),

    #[error(transparent)]
    Changelog(#[from] iconship_changelog::ChangelogError),

    #[error(transparent)]
    Git(#[from] iconship_git::GitError),

    #[error(transparent)]
    Project(#[from] iconship_project::ProjectError),

    #[error("[{step}] failed to run `{command}`")]
    CommandSpawn {
        step: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[{step}] command failed: {command}\n{output}")]
    CommandFailed {
        step: String,
        command: String,
        output: String,
    },

    #[error("missing required commands: {}", names.join(", "))]
    MissingTools { names: Vec<String> },

    #[error("release must run on {expected} branch (current branch: {actual})")]
    WrongBranch { expected: String, actual: String },

    #[error("release must target {expected} branch (GITHUB_REF_NAME: {actual})")]
    WrongRefName { expected: String, actual: String },

    #[error("HEAD is detached; release must run on {expected} branch")]
    DetachedHead { expected: String },

    #[error("working tree is not clean; commit or stash changes before release ({})", paths.join(", "))]
    DirtyWorkingTree { paths: Vec<String> },

    #[error("build left uncommitted changes ({}); run `prepare` and commit its output before a CI release", paths.join(", "))]
    BuildLeftChanges { paths: Vec<String> },

    #[error("tag already exists locally: {tag}")]
    LocalTagExists { tag: String },

    #[error("tag already exists on {remote}: {tag}")]
    RemoteTagExists { tag: String, remote: String },

    #[error("hosted release already exists: {tag}")]
    HostedReleaseExists { tag: String },

    #[error("failed to verify hosted release {tag}: {output}")]
    HostedQueryFailed { tag: String, output: String },

    #[error("failed to query registry for {package}: {output}")]
    RegistryQueryFailed { package: String, output: String },

    #[error("version {version} is already published for: {}", packages.join(", "))]
    AlreadyPublished {
        version: String,
        packages: Vec<String>,
    },

    #[error("invalid release tag '{tag}' (expected {prefix}X.Y.Z)")]
    InvalidTag { tag: String, prefix: String },

    #[error("no versioned package manifests found under '{0}'")]
    NoManifests(PathBuf),

    #[error("repository URL is missing from the root package.json")]
    MissingRepository,

    #[error("--type is not supported in CI mode (the version must already be prepared)")]
    TypeWithCi,

    #[error("configured {name} is empty")]
    EmptyCommand { name: &'static str },

    #[error("release version has not been determined yet")]
    MissingReleaseVersion,

    #[error("failed to write release notes file")]
    NotesFile(#[source] std::io::Error),

    #[error("release failed at step '{step}'")]
    ReleaseFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
        state: Box<ReleaseState>,
        recovery: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl OperationError {
    /// Next steps for the operator when a release stopped part way.
    #[must_use]
    pub fn recovery_guide(&self) -> Option<&[String]> {
        match self {
            Self::ReleaseFailed { recovery, .. } => Some(recovery),
            _ => None,
        }
    }

    pub(crate) fn from_pipeline(
        err: PipelineError<OperationError>,
        state: ReleaseState,
        recovery: Vec<String>,
    ) -> Self {
        let step = err.step().to_string();
        Self::ReleaseFailed {
            step,
            source: Box::new(err.into_source()),
            state: Box::new(state),
            recovery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_published_names_every_package() {
        let err = OperationError::AlreadyPublished {
            version: "1.2.0".to_string(),
            packages: vec!["@acme/icons-react".to_string(), "@acme/icons-vue".to_string()],
        };

        let msg = err.to_string();

        assert!(msg.contains("1.2.0"));
        assert!(msg.contains("@acme/icons-react, @acme/icons-vue"));
    }

    #[test]
    fn command_failure_carries_step_and_output() {
        let err = OperationError::CommandFailed {
            step: "build".to_string(),
            command: "pnpm run build".to_string(),
            output: "exit code 2".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "[build] command failed: pnpm run build\nexit code 2"
        );
    }

    #[test]
    fn only_release_failures_carry_a_recovery_guide() {
        let plain = OperationError::MissingRepository;
        assert!(plain.recovery_guide().is_none());

        let failed = OperationError::ReleaseFailed {
            step: "build".to_string(),
            source: Box::new(OperationError::MissingRepository),
            state: Box::default(),
            recovery: vec!["1. rerun".to_string()],
        };
        assert_eq!(failed.recovery_guide(), Some(&["1. rerun".to_string()][..]));
    }
}
