//! Repository synchronisation state machine.
//!
//! [`RepoSync`] decides, for every mutation of the tracked document, whether
//! to pull, how to commit, and whether to push. The actual version control
//! work is delegated to [`Git`].
//!
//! # Single writer
//!
//! Operations are synchronous and take no locks. Running two writers against
//! the same working directory at once races on pull, write, and commit;
//! callers must serialise access per path (for example with a file lock or a
//! single-writer process).

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use crate::config::RepoConfig;
use crate::git::{CommandRunner, Git};

mod bootstrap;
mod error;
mod fs;
mod outcome;

pub use bootstrap::{BootstrapStep, INITIAL_COMMIT_MESSAGE};
pub use error::RepoError;
pub use fs::DEFAULT_MODE;
pub use outcome::{CommitOutcome, NOTHING_TO_COMMIT_MARKERS, Revision, indicates_nothing_to_commit};

pub(crate) use fs::read_document;

/// Name of the tracked document inside the working directory.
pub const TRACKED_DOCUMENT: &str = "decider.json";

/// Repository operations, abstracted so callers can substitute fakes.
pub trait Repository {
    /// True when a working directory is configured. Performs no I/O.
    fn enabled(&self) -> bool;

    /// True when both a working directory and a remote are configured.
    /// Performs no I/O.
    fn push_enabled(&self) -> bool;

    /// True when the working directory contains a `.git` entry.
    fn exists(&self) -> bool;

    /// Best-effort bootstrap: clones the remote when the working directory is
    /// absent. Failures are logged, not returned, since the caller may be
    /// about to [`Repository::create`] the repository instead.
    fn init(&self);

    /// Creates a new repository holding an empty tracked document and, when
    /// a remote is configured, pushes it.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Bootstrap`] naming the failed step, or
    /// [`RepoError::Disabled`] when no working directory is configured.
    fn create(&self) -> Result<(), RepoError>;

    /// Clones the remote into the working directory. A no-op unless
    /// push-enabled.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Clone`] when git fails.
    fn clone_remote(&self) -> Result<(), RepoError>;

    /// Merges the remote's tracked branch into the working directory. A no-op
    /// unless push-enabled.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Pull`] carrying git's diagnostic.
    fn pull(&self) -> Result<(), RepoError>;

    /// Uploads local commits to the remote. A no-op unless push-enabled.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Push`] naming the remote.
    fn push(&self) -> Result<(), RepoError>;

    /// Resolves the head revision of the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::RevParse`] carrying git's diagnostic, or
    /// [`RepoError::Disabled`].
    fn current_sha(&self) -> Result<Revision, RepoError>;

    /// Pulls, replaces the tracked document with `payload`, and commits it
    /// with `message`. Does not push.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::PullBeforeCommit`], [`RepoError::Write`],
    /// [`RepoError::Commit`], or [`RepoError::Terminated`]. An unchanged
    /// payload is reported as [`CommitOutcome::NothingToCommit`], never as an
    /// error.
    fn commit(&self, payload: &[u8], message: &str) -> Result<CommitOutcome, RepoError>;
}

/// Synchronises the tracked document with its git repository.
#[derive(Debug)]
pub struct RepoSync<'git, R: CommandRunner> {
    config: RepoConfig,
    git: &'git Git<R>,
}

impl<'git, R: CommandRunner> RepoSync<'git, R> {
    /// Creates a synchroniser over `git`, which is resolved once by the
    /// caller and may be shared between repositories.
    #[must_use]
    pub const fn new(config: RepoConfig, git: &'git Git<R>) -> Self {
        Self { config, git }
    }

    /// Returns a reference to the underlying configuration.
    #[must_use]
    pub const fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Path of the tracked document, when synchronisation is enabled.
    #[must_use]
    pub fn document_path(&self) -> Option<Utf8PathBuf> {
        self.config
            .repo_path()
            .map(|dir| dir.join(TRACKED_DOCUMENT))
    }

    fn working_dir(&self, operation: &'static str) -> Result<&Utf8Path, RepoError> {
        self.config
            .repo_path()
            .ok_or(RepoError::Disabled { operation })
    }

    /// Working directory and remote URL, or `None` in local-only and
    /// disabled modes.
    fn remote(&self) -> Option<(&Utf8Path, &str)> {
        self.config.repo_path().zip(self.config.repo_url())
    }
}

impl<R: CommandRunner> Repository for RepoSync<'_, R> {
    fn enabled(&self) -> bool {
        self.config.is_enabled()
    }

    fn push_enabled(&self) -> bool {
        self.config.is_push_enabled()
    }

    fn exists(&self) -> bool {
        self.config.repo_path().is_some_and(is_repository)
    }

    fn init(&self) {
        let Some((dir, _)) = self.remote() else {
            debug!("no remote configured; skipping clone");
            return;
        };
        if self.exists() {
            debug!(path = %dir, "repository already present; skipping clone");
            return;
        }
        if let Err(err) = self.clone_remote() {
            warn!(error = %err, "initial clone failed; create the repository to bootstrap it");
        }
    }

    fn create(&self) -> Result<(), RepoError> {
        let dir = self.working_dir("create repository")?;
        self.bootstrap(dir)
    }

    fn clone_remote(&self) -> Result<(), RepoError> {
        let Some((dir, url)) = self.remote() else {
            debug!("no remote configured; skipping clone");
            return Ok(());
        };

        let output = self.git.clone_into(url, dir)?;
        if !output.is_success() {
            return Err(RepoError::Clone {
                url: url.to_owned(),
                path: dir.to_path_buf(),
                detail: output.diagnostic(),
            });
        }
        info!(path = %dir, url, "cloned decider repository");
        Ok(())
    }

    fn pull(&self) -> Result<(), RepoError> {
        let Some((dir, _)) = self.remote() else {
            return Ok(());
        };

        let output = self.git.pull(dir)?;
        if output.is_success() {
            return Ok(());
        }
        Err(RepoError::Pull {
            detail: output.diagnostic(),
        })
    }

    fn push(&self) -> Result<(), RepoError> {
        let Some((dir, url)) = self.remote() else {
            return Ok(());
        };

        let output = self.git.push(dir)?;
        if output.is_success() {
            info!(url, "pushed decider repository");
            return Ok(());
        }
        Err(RepoError::Push {
            url: url.to_owned(),
            detail: output.diagnostic(),
        })
    }

    fn current_sha(&self) -> Result<Revision, RepoError> {
        let dir = self.working_dir("resolve HEAD")?;
        let output = self.git.rev_parse_head(dir)?;
        let sha = output.stdout.trim();
        if !output.is_success() || sha.is_empty() {
            return Err(RepoError::RevParse {
                detail: output.diagnostic(),
            });
        }
        Ok(Revision::new(sha))
    }

    fn commit(&self, payload: &[u8], message: &str) -> Result<CommitOutcome, RepoError> {
        let Some(dir) = self.config.repo_path() else {
            debug!("repository synchronisation disabled; skipping commit");
            return Ok(CommitOutcome::Disabled);
        };

        self.pull().map_err(|err| RepoError::PullBeforeCommit {
            url: self.config.repo_url().unwrap_or_default().to_owned(),
            source: Box::new(err),
        })?;

        let document = dir.join(TRACKED_DOCUMENT);
        fs::write_document(&document, payload).map_err(|err| RepoError::Write {
            path: document,
            message: err.to_string(),
        })?;

        let output = self.git.commit_all(dir, message)?;
        let outcome = outcome::classify_commit(dir, &output)?;
        info!(path = %dir, %outcome, "recorded decider change");
        Ok(outcome)
    }
}

/// True when `path` contains a `.git` entry. Linked worktrees and
/// submodules use a `.git` file pointing at the real git directory, so any
/// file type counts.
#[must_use]
pub fn is_repository(path: &Utf8Path) -> bool {
    path.join(".git").exists()
}

#[cfg(test)]
mod tests;
