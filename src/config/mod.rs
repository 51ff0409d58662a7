//! Repository configuration loaded via `ortho-config`.
//!
//! [`RepoConfig`] merges defaults, configuration files, and environment
//! variables. Two fields drive every decision [`crate::repo::RepoSync`]
//! makes:
//!
//! - `repo_path` set: synchronisation is enabled.
//! - `repo_url` also set: the repository is push-enabled; otherwise it runs
//!   in local-only mode, committing without ever cloning, pulling, or
//!   pushing.
//!
//! Blank values are treated the same as absent ones.

use camino::Utf8Path;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Git repository settings loaded via `ortho-config`.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "DECIDER_GIT",
    discovery(
        app_name = "decider-sync",
        env_var = "DECIDER_SYNC_CONFIG_PATH",
        config_file_name = "decider-sync.toml",
        dotfile_name = ".decider-sync.toml",
        project_file_name = "decider-sync.toml"
    )
)]
pub struct RepoConfig {
    /// Local working directory holding the tracked document. Leaving it
    /// unset disables synchronisation entirely.
    pub repo_path: Option<String>,
    /// Remote URL the working directory is cloned from and pushed to.
    pub repo_url: Option<String>,
    /// Explicit `git` executable; when unset, `git` is looked up on `PATH`.
    pub git_bin: Option<String>,
}

/// Errors raised when loading the repository configuration from layered
/// sources.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates that parsing or merging configuration layers failed.
    #[error("repository configuration parsing failed: {0}")]
    Parse(String),
}

impl RepoConfig {
    /// Configuration with synchronisation switched off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            repo_path: None,
            repo_url: None,
            git_bin: None,
        }
    }

    /// Local-only configuration: commits land in `repo_path` and never leave
    /// it.
    #[must_use]
    pub fn local(repo_path: impl Into<String>) -> Self {
        Self {
            repo_path: Some(repo_path.into()),
            ..Self::disabled()
        }
    }

    /// Configuration synchronising `repo_path` with `repo_url`.
    #[must_use]
    pub fn with_remote(repo_path: impl Into<String>, repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: Some(repo_url.into()),
            ..Self::local(repo_path)
        }
    }

    /// Loads configuration using defaults, configuration files, and
    /// environment variables, ignoring the process arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when merging sources fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("decider-sync")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads configuration using the default argument iterator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when merging sources fails.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Working directory, if synchronisation is enabled.
    #[must_use]
    pub fn repo_path(&self) -> Option<&Utf8Path> {
        non_blank(self.repo_path.as_deref()).map(Utf8Path::new)
    }

    /// Remote URL, if one is configured.
    #[must_use]
    pub fn repo_url(&self) -> Option<&str> {
        non_blank(self.repo_url.as_deref())
    }

    /// Explicit git executable, if one is configured.
    #[must_use]
    pub fn git_bin(&self) -> Option<&str> {
        non_blank(self.git_bin.as_deref())
    }

    /// True when a working directory is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.repo_path().is_some()
    }

    /// True when both a working directory and a remote are configured.
    #[must_use]
    pub fn is_push_enabled(&self) -> bool {
        self.is_enabled() && self.repo_url().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
