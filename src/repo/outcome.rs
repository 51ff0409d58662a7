//! Commit outcomes, revisions, and the "nothing to commit" predicate.

use std::fmt;

use camino::Utf8Path;

use crate::git::CommandOutput;

use super::RepoError;

/// Phrases git prints when a commit finds no changes. Git reports this with
/// a non-zero exit status, so it has to be recognised from the text.
pub const NOTHING_TO_COMMIT_MARKERS: [&str; 2] = ["nothing to commit", "nothing added to commit"];

/// Successful result of [`crate::repo::Repository::commit`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommitOutcome {
    /// A new commit was recorded.
    Committed,
    /// The payload matched the tracked document; history is unchanged.
    NothingToCommit,
    /// Synchronisation is disabled; nothing was touched.
    Disabled,
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Committed => "committed",
            Self::NothingToCommit => "nothing to commit",
            Self::Disabled => "synchronisation disabled",
        };
        f.write_str(text)
    }
}

/// Opaque identifier of the head revision.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Revision(String);

impl Revision {
    /// Wraps a revision identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the identifier.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns `true` when git's output says there was nothing to commit.
///
/// Both streams are inspected; git versions differ in where they print the
/// message.
#[must_use]
pub fn indicates_nothing_to_commit(output: &CommandOutput) -> bool {
    [output.stdout.as_str(), output.stderr.as_str()]
        .into_iter()
        .any(|stream| {
            NOTHING_TO_COMMIT_MARKERS
                .iter()
                .any(|marker| stream.contains(marker))
        })
}

/// Maps the output of `git commit` to an outcome.
///
/// A successful commit echoes its message in the `[branch sha] message`
/// summary, so the markers are only consulted once git has exited non-zero,
/// and then before the exit status is treated as a failure.
pub(super) fn classify_commit(
    dir: &Utf8Path,
    output: &CommandOutput,
) -> Result<CommitOutcome, RepoError> {
    if output.is_success() {
        return Ok(CommitOutcome::Committed);
    }
    if indicates_nothing_to_commit(output) {
        return Ok(CommitOutcome::NothingToCommit);
    }

    match output.code {
        Some(_) => Err(RepoError::Commit {
            path: dir.to_path_buf(),
            output: output.diagnostic(),
        }),
        None => Err(RepoError::Terminated {
            operation: "commit",
            path: dir.to_path_buf(),
        }),
    }
}
