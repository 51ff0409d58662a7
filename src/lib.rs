//! Core library for the decider-sync tool.
//!
//! The crate keeps a configuration document (the decider file) inside a git
//! repository and synchronises it with a remote, so that every operator and
//! machine converges on the same state. Version control itself is delegated
//! to the system `git` executable; this crate decides when to pull, how to
//! commit, and whether to push.

pub mod config;
pub mod git;
pub mod repo;
#[cfg(test)]
pub mod test_helpers;
pub mod test_support;

pub use config::{ConfigError, RepoConfig};
pub use git::{
    CommandOutput, CommandRunner, Git, GitError, GitExecutable, ProcessCommandRunner,
    REMOTE_NAME, TRACKED_BRANCH,
};
pub use repo::{
    BootstrapStep, CommitOutcome, DEFAULT_MODE, INITIAL_COMMIT_MESSAGE, RepoError, RepoSync,
    Repository, Revision, TRACKED_DOCUMENT, indicates_nothing_to_commit, is_repository,
};
