use std::env;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::traits::{CommandOutput, CommandRunner, CommandSpec};
use crate::{OperationError, Result};

/// Runs commands as child processes of the current one.
pub struct ProcessRunner;

impl ProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ProcessRunner {
    fn tool_exists(&self, name: &str) -> bool {
        let Some(paths) = env::var_os("PATH") else {
            return false;
        };
        env::split_paths(&paths).any(|dir| is_executable(&dir.join(name)))
    }

    fn run(&self, step: &str, spec: &CommandSpec) -> Result<CommandOutput> {
        debug!(step, command = %spec, cwd = %spec.cwd.display(), "running command");

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).current_dir(&spec.cwd);

        let spawn_error = |source| OperationError::CommandSpawn {
            step: step.to_string(),
            command: spec.to_string(),
            source,
        };

        if spec.inherit_output {
            let status = command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(spawn_error)?;
            return Ok(CommandOutput {
                code: status.code(),
                ..CommandOutput::default()
            });
        }

        let output = command.stdin(Stdio::null()).output().map_err(spawn_error)?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file() || path.with_extension("cmd").is_file()
}
