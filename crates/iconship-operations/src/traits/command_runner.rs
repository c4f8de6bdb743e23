use std::fmt;
use std::path::{Path, PathBuf};

use crate::Result;

/// A process to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Pass stdout/stderr through to the terminal instead of capturing them.
    pub inherit_output: bool,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            inherit_output: false,
        }
    }

    /// Builds a spec from a configured `[program, args...]` list.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn from_argv(argv: &[String], cwd: &Path) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), cwd).args(args.iter().cloned()))
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn inherit_output(mut self) -> Self {
        self.inherit_output = true;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stderr and stdout together, for pattern checks on tool messages.
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stderr, self.stdout)
    }

    /// The most useful single diagnostic: stderr, else stdout, else the exit code.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

pub trait CommandRunner: Send + Sync {
    /// True when `name` resolves to an executable on `PATH`.
    fn tool_exists(&self, name: &str) -> bool;

    /// Runs the command to completion. A non-zero exit is not an error here;
    /// callers decide what a failure means.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::CommandSpawn` if the process cannot be started.
    fn run(&self, step: &str, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Runs the command and fails on a non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::CommandFailed` carrying the command's
    /// diagnostic output when it exits unsuccessfully.
    fn run_checked(&self, step: &str, spec: &CommandSpec) -> Result<CommandOutput> {
        let output = self.run(step, spec)?;
        if output.success() {
            Ok(output)
        } else {
            Err(crate::OperationError::CommandFailed {
                step: step.to_string(),
                command: spec.to_string(),
                output: output.failure_summary(),
            })
        }
    }
}
