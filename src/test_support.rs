//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::git::{CommandOutput, CommandRunner, GitError};
use crate::repo::read_document;

/// Scripted command runner that returns pre-seeded outputs in FIFO order.
///
/// Used to drive deterministic git outcomes without spawning processes.
/// Clones share their queue and invocation log.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRunner {
    responses: Rc<RefCell<VecDeque<CommandOutput>>>,
    invocations: Rc<RefCell<Vec<CommandInvocation>>>,
    watched: Rc<RefCell<Option<Utf8PathBuf>>>,
}

/// Records a single invocation made through [`ScriptedRunner`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandInvocation {
    /// Program name as passed to the runner.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
    /// Working directory the command ran in.
    pub dir: Option<Utf8PathBuf>,
    /// Contents of the watched file at the moment of the invocation, if a
    /// file is watched and readable.
    pub observed: Option<Vec<u8>>,
}

impl CommandInvocation {
    /// Returns a shell-like command string for assertions.
    #[must_use]
    pub fn command_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        parts.extend(
            self.args
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    /// Returns the git subcommand (the first argument), if any.
    #[must_use]
    pub fn subcommand(&self) -> Option<String> {
        self.args
            .first()
            .map(|arg| arg.to_string_lossy().into_owned())
    }
}

impl ScriptedRunner {
    /// Creates a new runner with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }

    /// Returns the subcommands invoked so far, in order.
    #[must_use]
    pub fn subcommands(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .filter_map(CommandInvocation::subcommand)
            .collect()
    }

    /// Snapshots the contents of `path` on every later invocation.
    pub fn watch_file(&self, path: &Utf8Path) {
        self.watched.replace(Some(path.to_path_buf()));
    }

    /// Pushes a successful exit status.
    pub fn push_success(&self) {
        self.push_output(Some(0), "", "");
    }

    /// Pushes a specific exit code.
    pub fn push_exit_code(&self, code: i32) {
        self.push_output(Some(code), "", "");
    }

    /// Pushes a failing exit code with stderr text.
    pub fn push_failure(&self, code: i32) {
        self.push_output(Some(code), "", "simulated failure");
    }

    /// Pushes a response with no exit code to simulate abnormal termination.
    pub fn push_missing_exit_code(&self) {
        self.push_output(None, "", "");
    }

    /// Pushes an explicit command output response.
    pub fn push_output(
        &self,
        code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) {
        self.responses.borrow_mut().push_back(CommandOutput {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        });
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        program: &str,
        args: &[OsString],
        dir: Option<&Utf8Path>,
    ) -> Result<CommandOutput, GitError> {
        let observed = self
            .watched
            .borrow()
            .as_deref()
            .and_then(|path| read_document(path).ok());
        self.invocations.borrow_mut().push(CommandInvocation {
            program: program.to_owned(),
            args: args.to_vec(),
            dir: dir.map(Utf8Path::to_path_buf),
            observed,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| GitError::Spawn {
                program: program.to_owned(),
                message: String::from("no scripted response available"),
            })
    }
}
