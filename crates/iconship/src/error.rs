use iconship_operations::OperationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Manual next steps for a release that stopped part way.
    pub fn recovery_guide(&self) -> Option<&[String]> {
        match self {
            Self::Operation(err) => err.recovery_guide(),
            Self::CurrentDir(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use iconship_operations::{OperationError, ReleaseMode, ReleaseState};

    use super::CliError;

    fn release_failure() -> CliError {
        OperationError::ReleaseFailed {
            step: "build".to_string(),
            source: Box::new(OperationError::CommandFailed {
                step: "build".to_string(),
                command: "pnpm run build".to_string(),
                output: "exit code 1".to_string(),
            }),
            state: Box::new(ReleaseState {
                mode: ReleaseMode::Local,
                ..ReleaseState::default()
            }),
            recovery: vec!["1. Review changed files: git status --short".to_string()],
        }
        .into()
    }

    #[test]
    fn operation_error_message_is_passed_through() {
        let err: CliError = OperationError::MissingRepository.into();

        assert_eq!(
            err.to_string(),
            "repository URL is missing from the root package.json"
        );
        assert!(err.recovery_guide().is_none());
    }

    #[test]
    fn release_failure_exposes_step_cause_and_guide() {
        let err = release_failure();

        assert_eq!(err.to_string(), "release failed at step 'build'");
        let cause = std::error::Error::source(&err).expect("step error is the source");
        assert!(cause.to_string().contains("pnpm run build"));
        assert_eq!(err.recovery_guide().map(<[String]>::len), Some(1));
    }

    #[test]
    fn current_dir_error_has_source_chain() {
        let err = CliError::CurrentDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));

        assert!(err.to_string().contains("current directory"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
