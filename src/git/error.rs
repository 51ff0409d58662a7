//! Errors raised by the git backend.

use thiserror::Error;

/// Errors surfaced while locating or invoking the `git` executable.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GitError {
    /// Raised when the executable cannot be found on `PATH` or at the
    /// configured location.
    #[error("{program} not found: {message}")]
    ToolNotFound {
        /// Program name or path that was looked up.
        program: String,
        /// Lookup failure description.
        message: String,
    },
    /// Raised when a command cannot be spawned.
    #[error("failed to spawn {program}: {message}")]
    Spawn {
        /// Command that failed to start.
        program: String,
        /// Operating system error string.
        message: String,
    },
}
