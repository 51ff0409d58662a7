//! Command-line interface definitions for the `decider-sync` binary.
//!
//! The clap parser structures live here so the main binary and the build
//! script can share them when generating the manual page.

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI for the `decider-sync` binary.
#[derive(Debug, Parser)]
#[command(
    name = "decider-sync",
    about = "Keep a decider feature-flag document in sync with a git repository",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Raise log verbosity (`-v` for info, `-vv` for debug). `RUST_LOG`
    /// takes precedence when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub(crate) verbose: u8,
    /// Override the working directory (`DECIDER_GIT_REPO_PATH`).
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) repo_path: Option<String>,
    /// Override the remote URL (`DECIDER_GIT_REPO_URL`).
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) repo_url: Option<String>,
    /// Operation to perform.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Operations exposed by the binary.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Report the resolved configuration and whether the repository exists.
    Status,
    /// Clone the remote when the working directory is missing.
    Init,
    /// Create a repository holding an empty decider document.
    Create,
    /// Replace the decider document and commit it.
    Commit(CommitCommand),
    /// Merge the remote's tracked branch into the working directory.
    Pull,
    /// Upload local commits to the remote.
    Push,
    /// Print the head revision of the working directory.
    Sha,
}

/// Arguments for the `decider-sync commit` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CommitCommand {
    /// Commit message recorded for the change.
    #[arg(short, long)]
    pub(crate) message: String,
    /// Read the new document from this file instead of standard input.
    #[arg(long, value_name = "PATH")]
    pub(crate) file: Option<String>,
    /// Push to the remote after a successful commit.
    #[arg(long)]
    pub(crate) push: bool,
}
