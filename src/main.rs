//! Binary entry point for the `decider-sync` CLI.

use std::io::{self, Read, Write};
use std::process;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use decider_sync::{
    CommitOutcome, ConfigError, Git, GitError, RepoConfig, RepoError, RepoSync, Repository,
    is_repository,
};

mod cli;

use cli::{Cli, Command, CommitCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("git unavailable: {0}")]
    Git(#[from] GitError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("failed to read document from {origin}: {message}")]
    Input { origin: String, message: String },
    #[error("document is not valid JSON: {0}")]
    InvalidDocument(String),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match dispatch(cli) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config = apply_overrides(
        RepoConfig::load_without_cli_args()?,
        cli.repo_path,
        cli.repo_url,
    );
    let mut stdout = io::stdout();

    if matches!(cli.command, Command::Status) {
        return write_status(&mut stdout, &config);
    }

    let git = Git::from_config(&config)?;
    let repo = RepoSync::new(config, &git);
    run_command(&repo, &cli.command, &mut stdout)
}

fn apply_overrides(
    mut config: RepoConfig,
    repo_path: Option<String>,
    repo_url: Option<String>,
) -> RepoConfig {
    if repo_path.is_some() {
        config.repo_path = repo_path;
    }
    if repo_url.is_some() {
        config.repo_url = repo_url;
    }
    config
}

fn run_command(
    repo: &impl Repository,
    command: &Command,
    mut out: impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Status => {}
        Command::Init => {
            repo.init();
            writeln!(out, "exists: {}", yes_no(repo.exists()))?;
        }
        Command::Create => {
            repo.create()?;
            writeln!(out, "created")?;
        }
        Command::Commit(args) => run_commit(repo, args, &mut out)?,
        Command::Pull => repo.pull()?,
        Command::Push => repo.push()?,
        Command::Sha => {
            let sha = repo.current_sha()?;
            writeln!(out, "{sha}")?;
        }
    }
    Ok(())
}

fn run_commit(
    repo: &impl Repository,
    args: &CommitCommand,
    mut out: impl Write,
) -> Result<(), CliError> {
    let payload = read_payload(args.file.as_deref())?;
    serde_json::from_slice::<serde_json::Value>(&payload)
        .map_err(|err| CliError::InvalidDocument(err.to_string()))?;
    let outcome = repo.commit(&payload, &args.message)?;
    writeln!(out, "{outcome}")?;

    if args.push && outcome == CommitOutcome::Committed {
        repo.push()?;
        if repo.push_enabled() {
            writeln!(out, "pushed")?;
        }
    }
    Ok(())
}

fn read_payload(file: Option<&str>) -> Result<Vec<u8>, CliError> {
    let Some(path) = file else {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|err| CliError::Input {
                origin: String::from("stdin"),
                message: err.to_string(),
            })?;
        return Ok(buffer);
    };

    let path = Utf8Path::new(path);
    let input_error = |message: String| CliError::Input {
        origin: path.to_string(),
        message,
    };
    let name = path
        .file_name()
        .ok_or_else(|| input_error(String::from("path does not name a file")))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.read(name))
        .map_err(|err| input_error(err.to_string()))
}

fn write_status(mut out: impl Write, config: &RepoConfig) -> Result<(), CliError> {
    let mode = if config.is_push_enabled() {
        "push-enabled"
    } else if config.is_enabled() {
        "local-only"
    } else {
        "disabled"
    };
    writeln!(out, "mode: {mode}")?;
    writeln!(
        out,
        "path: {}",
        config.repo_path().map_or("-", Utf8Path::as_str)
    )?;
    writeln!(out, "remote: {}", config.repo_url().unwrap_or("-"))?;
    writeln!(
        out,
        "exists: {}",
        yes_no(config.repo_path().is_some_and(is_repository))
    )?;
    Ok(())
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
