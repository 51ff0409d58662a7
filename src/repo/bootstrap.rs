//! Creation of a brand-new repository.

use std::fmt;

use camino::Utf8Path;
use tracing::info;

use crate::git::{CommandOutput, CommandRunner, GitError};

use super::{RepoError, RepoSync, TRACKED_DOCUMENT, fs};

/// Message of the first commit in a freshly created repository.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initializing decider repo";

/// Individual steps of [`crate::repo::Repository::create`], in order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BootstrapStep {
    /// Create the working directory tree.
    CreateDirectory,
    /// Write the empty tracked document.
    WriteDocument,
    /// `git init`.
    InitRepository,
    /// Point `HEAD` at the tracked branch.
    PinBranch,
    /// Stage the working directory.
    StageFiles,
    /// Record the initial commit.
    InitialCommit,
    /// Register the remote.
    AddRemote,
    /// Push the initial commit.
    Push,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CreateDirectory => "create repository directory",
            Self::WriteDocument => "create tracked document",
            Self::InitRepository => "init repository",
            Self::PinBranch => "pin tracked branch",
            Self::StageFiles => "stage files",
            Self::InitialCommit => "create initial commit",
            Self::AddRemote => "add remote",
            Self::Push => "push initial commit",
        };
        f.write_str(text)
    }
}

impl<R: CommandRunner> RepoSync<'_, R> {
    pub(super) fn bootstrap(&self, dir: &Utf8Path) -> Result<(), RepoError> {
        let dir_target = dir.as_str();
        fs::create_dir_tree(dir).map_err(|err| RepoError::Bootstrap {
            step: BootstrapStep::CreateDirectory,
            target: dir_target.to_owned(),
            detail: err.to_string(),
        })?;

        let document = dir.join(TRACKED_DOCUMENT);
        fs::write_document(&document, &[]).map_err(|err| RepoError::Bootstrap {
            step: BootstrapStep::WriteDocument,
            target: document.to_string(),
            detail: err.to_string(),
        })?;

        let git = self.git;
        check_step(BootstrapStep::InitRepository, dir_target, git.init(dir))?;
        check_step(BootstrapStep::PinBranch, dir_target, git.pin_branch(dir))?;
        check_step(BootstrapStep::StageFiles, dir_target, git.add_all(dir))?;
        check_step(
            BootstrapStep::InitialCommit,
            dir_target,
            git.commit_staged(dir, INITIAL_COMMIT_MESSAGE),
        )?;

        let Some(url) = self.config.repo_url() else {
            info!(path = %dir, "created local-only decider repository");
            return Ok(());
        };

        check_step(BootstrapStep::AddRemote, url, git.add_remote(dir, url))?;
        check_step(BootstrapStep::Push, url, git.push(dir))?;
        info!(path = %dir, url, "created decider repository and pushed initial commit");
        Ok(())
    }
}

fn check_step(
    step: BootstrapStep,
    target: &str,
    result: Result<CommandOutput, GitError>,
) -> Result<(), RepoError> {
    let failure = |detail: String| RepoError::Bootstrap {
        step,
        target: target.to_owned(),
        detail,
    };

    let output = result.map_err(|err| failure(err.to_string()))?;
    if output.is_success() {
        return Ok(());
    }

    let diagnostic = output.diagnostic();
    Err(failure(if diagnostic.is_empty() {
        format!("git exited with status {}", output.status_text())
    } else {
        diagnostic
    }))
}
