//! Thin backend over the system `git` executable.
//!
//! [`Git`] resolves the executable once, at construction, and then issues
//! one fresh process per operation scoped to the requested working
//! directory. It keeps no state between calls and never interprets output
//! beyond handing back a [`CommandOutput`]; deciding what an outcome means is
//! the job of [`crate::repo::RepoSync`].

use std::ffi::OsString;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::config::RepoConfig;

mod error;
mod types;

pub use error::GitError;
pub use types::{CommandOutput, CommandRunner, ProcessCommandRunner};

/// Name under which the configured remote is registered.
pub const REMOTE_NAME: &str = "origin";

/// The single line of history that is synchronised.
pub const TRACKED_BRANCH: &str = "master";

const DEFAULT_PROGRAM: &str = "git";

/// Resolved location of the `git` executable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GitExecutable {
    path: Utf8PathBuf,
}

impl GitExecutable {
    /// Looks `git` up on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ToolNotFound`] when no executable is found.
    pub fn discover() -> Result<Self, GitError> {
        Self::locate(DEFAULT_PROGRAM)
    }

    /// Resolves `program`, which may be a bare name searched on `PATH` or an
    /// explicit path to an executable.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ToolNotFound`] when the program cannot be resolved
    /// or its location is not valid UTF-8.
    pub fn locate(program: &str) -> Result<Self, GitError> {
        let resolved = which::which(program).map_err(|err| GitError::ToolNotFound {
            program: program.to_owned(),
            message: err.to_string(),
        })?;
        let path = Utf8PathBuf::from_path_buf(resolved).map_err(|path| {
            GitError::ToolNotFound {
                program: program.to_owned(),
                message: format!("resolved path {} is not valid UTF-8", path.display()),
            }
        })?;
        Ok(Self { path })
    }

    /// Honours the `git_bin` override from configuration, falling back to a
    /// `PATH` lookup.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ToolNotFound`] when the executable cannot be
    /// resolved.
    pub fn from_config(config: &RepoConfig) -> Result<Self, GitError> {
        config.git_bin().map_or_else(Self::discover, Self::locate)
    }

    /// Wraps an already known path without checking that it exists.
    #[must_use]
    pub fn from_path(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the executable path.
    #[must_use]
    pub fn as_path(&self) -> &Utf8Path {
        &self.path
    }
}

impl fmt::Display for GitExecutable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

/// Executes individual git operations through a [`CommandRunner`].
#[derive(Clone, Debug)]
pub struct Git<R: CommandRunner> {
    executable: GitExecutable,
    runner: R,
}

impl Git<ProcessCommandRunner> {
    /// Resolves the executable from configuration and wires the real process
    /// runner.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ToolNotFound`] when the executable cannot be
    /// resolved.
    pub fn from_config(config: &RepoConfig) -> Result<Self, GitError> {
        Ok(Self::new(
            GitExecutable::from_config(config)?,
            ProcessCommandRunner::new(),
        ))
    }
}

impl<R: CommandRunner> Git<R> {
    /// Creates a backend from a resolved executable and a runner.
    #[must_use]
    pub const fn new(executable: GitExecutable, runner: R) -> Self {
        Self { executable, runner }
    }

    /// Returns the resolved executable.
    #[must_use]
    pub const fn executable(&self) -> &GitExecutable {
        &self.executable
    }

    /// Returns the underlying runner.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// `git init`
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn init(&self, dir: &Utf8Path) -> Result<CommandOutput, GitError> {
        self.run(Some(dir), &["init"])
    }

    /// Points `HEAD` at the tracked branch. Only meaningful on a freshly
    /// initialised repository whose branch is still unborn.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn pin_branch(&self, dir: &Utf8Path) -> Result<CommandOutput, GitError> {
        let reference = format!("refs/heads/{TRACKED_BRANCH}");
        self.run(Some(dir), &["symbolic-ref", "HEAD", &reference])
    }

    /// `git clone <url> <dir>`, run from the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn clone_into(&self, url: &str, dir: &Utf8Path) -> Result<CommandOutput, GitError> {
        self.run(None, &["clone", url, dir.as_str()])
    }

    /// `git add .`
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn add_all(&self, dir: &Utf8Path) -> Result<CommandOutput, GitError> {
        self.run(Some(dir), &["add", "."])
    }

    /// `git commit -m <message>`, committing whatever is staged.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn commit_staged(&self, dir: &Utf8Path, message: &str) -> Result<CommandOutput, GitError> {
        self.run(Some(dir), &["commit", "-m", message])
    }

    /// `git commit -am <message>`, committing every modified tracked file.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn commit_all(&self, dir: &Utf8Path, message: &str) -> Result<CommandOutput, GitError> {
        self.run(Some(dir), &["commit", "-am", message])
    }

    /// Registers `url` as the [`REMOTE_NAME`] remote.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn add_remote(&self, dir: &Utf8Path, url: &str) -> Result<CommandOutput, GitError> {
        self.run(Some(dir), &["remote", "add", REMOTE_NAME, url])
    }

    /// Pushes `HEAD` to the tracked branch on the remote. Never forces.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn push(&self, dir: &Utf8Path) -> Result<CommandOutput, GitError> {
        let refspec = format!("HEAD:{TRACKED_BRANCH}");
        self.run(Some(dir), &["push", REMOTE_NAME, &refspec])
    }

    /// Fetches and merges the tracked branch from the remote.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn pull(&self, dir: &Utf8Path) -> Result<CommandOutput, GitError> {
        self.run(Some(dir), &["pull", REMOTE_NAME, TRACKED_BRANCH])
    }

    /// `git rev-parse HEAD`
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Spawn`] when git cannot be started.
    pub fn rev_parse_head(&self, dir: &Utf8Path) -> Result<CommandOutput, GitError> {
        self.run(Some(dir), &["rev-parse", "HEAD"])
    }

    fn run(&self, dir: Option<&Utf8Path>, args: &[&str]) -> Result<CommandOutput, GitError> {
        debug!(program = %self.executable, ?args, ?dir, "running git");
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        let output = self
            .runner
            .run(self.executable.as_path().as_str(), &os_args, dir)?;
        debug!(status = %output.status_text(), "git finished");
        Ok(output)
    }
}
