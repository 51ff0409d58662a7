//! Command output and the runner abstraction used to drive `git`.

use std::ffi::OsString;
use std::process::Command;

use camino::Utf8Path;

use super::GitError;

/// Result of running an external command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandOutput {
    /// Exit code reported by the process, if available.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` when the exit code equals zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Human readable representation of the exit status.
    #[must_use]
    pub fn status_text(&self) -> String {
        self.code
            .map_or_else(|| String::from("unknown"), |code| code.to_string())
    }

    /// Raw diagnostic text reported by the process: stderr followed by
    /// stdout, with empty streams omitted.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        [self.stderr.trim_end(), self.stdout.trim_end()]
            .into_iter()
            .filter(|stream| !stream.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Abstraction over command execution to support fakes in tests.
pub trait CommandRunner {
    /// Runs `program` with the given arguments inside `dir` (or the current
    /// directory when `None`), capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] if the command cannot be started.
    fn run(
        &self,
        program: &str,
        args: &[OsString],
        dir: Option<&Utf8Path>,
    ) -> Result<CommandOutput, GitError>;
}

/// Real command runner that shells out to the host operating system.
///
/// Extra environment variables can be attached with
/// [`ProcessCommandRunner::with_env`], for example to give automated commits
/// a fixed author identity.
#[derive(Clone, Debug, Default)]
pub struct ProcessCommandRunner {
    envs: Vec<(String, String)>,
}

impl ProcessCommandRunner {
    /// Creates a runner that inherits the parent environment unchanged.
    #[must_use]
    pub const fn new() -> Self {
        Self { envs: Vec::new() }
    }

    /// Adds an environment variable passed to every spawned process.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl CommandRunner for ProcessCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[OsString],
        dir: Option<&Utf8Path>,
    ) -> Result<CommandOutput, GitError> {
        let mut command = Command::new(program);
        command.args(args);
        command.envs(self.envs.iter().map(|(key, value)| (key, value)));
        if let Some(working_dir) = dir {
            command.current_dir(working_dir);
        }

        let output = command.output().map_err(|err| GitError::Spawn {
            program: program.to_owned(),
            message: err.to_string(),
        })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
