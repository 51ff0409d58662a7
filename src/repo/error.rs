//! Error types for the repository synchronisation workflow.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::git::GitError;

use super::bootstrap::BootstrapStep;

/// Errors raised while bootstrapping or synchronising the repository.
///
/// Every variant names the local path or remote URL involved and keeps the
/// raw git diagnostic where one exists, so an operator can act on the
/// message without re-running the command by hand.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RepoError {
    /// Raised when an operation that needs a working directory runs while
    /// synchronisation is disabled.
    #[error("cannot {operation}: repository synchronisation is disabled (repo_path is not set)")]
    Disabled {
        /// Operation that was refused.
        operation: &'static str,
    },
    /// Raised when a step of repository creation fails. The repository must
    /// be treated as unusable.
    #[error("failed to {step} for {target}: {detail}")]
    Bootstrap {
        /// Step that failed.
        step: BootstrapStep,
        /// Path or URL the step acted on.
        target: String,
        /// Raw diagnostic or OS error.
        detail: String,
    },
    /// Raised when cloning the remote fails.
    #[error("could not clone {url} into {path}: {detail}")]
    Clone {
        /// Remote URL.
        url: String,
        /// Local working directory.
        path: Utf8PathBuf,
        /// Raw git diagnostic.
        detail: String,
    },
    /// Raised when `git pull` fails; the message is git's own output.
    #[error("pull failed: {detail}")]
    Pull {
        /// Raw git diagnostic.
        detail: String,
    },
    /// Raised when the pull preceding a commit fails. Nothing was written.
    #[error("could not pull from {url}: {source}")]
    PullBeforeCommit {
        /// Remote URL.
        url: String,
        /// Underlying pull failure.
        #[source]
        source: Box<RepoError>,
    },
    /// Raised when `git push` fails.
    #[error("failed to push to {url}: {detail}")]
    Push {
        /// Remote URL.
        url: String,
        /// Raw git diagnostic.
        detail: String,
    },
    /// Raised when the head revision cannot be resolved.
    #[error("could not resolve HEAD: {detail}")]
    RevParse {
        /// Raw git diagnostic.
        detail: String,
    },
    /// Raised when `git commit` fails for a reason other than an empty
    /// change set.
    #[error("could not commit change to {path}: {output}")]
    Commit {
        /// Local working directory.
        path: Utf8PathBuf,
        /// Raw git diagnostic.
        output: String,
    },
    /// Raised when the tracked document cannot be written.
    #[error("could not write change to {path}: {message}")]
    Write {
        /// Path of the tracked document.
        path: Utf8PathBuf,
        /// Operating system error string.
        message: String,
    },
    /// Raised when git ends without an exit status, for example when killed
    /// by a signal.
    #[error("git {operation} in {path} terminated without an exit status")]
    Terminated {
        /// Git operation that was running.
        operation: &'static str,
        /// Working directory the operation ran in.
        path: Utf8PathBuf,
    },
    /// Raised when git itself cannot be started.
    #[error(transparent)]
    Backend(#[from] GitError),
}
