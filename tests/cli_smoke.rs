//! Behavioural smoke tests for the CLI entrypoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

const CONFIG_VARS: [&str; 4] = [
    "DECIDER_GIT_REPO_PATH",
    "DECIDER_GIT_REPO_URL",
    "DECIDER_GIT_GIT_BIN",
    "DECIDER_SYNC_CONFIG_PATH",
];

fn decider_sync() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("decider-sync");
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn cli_without_arguments_prints_usage() {
    decider_sync()
        .assert()
        .failure()
        .stderr(contains("Usage"));
}

#[test]
fn status_reports_disabled_without_configuration() {
    let dir = tempfile::tempdir().expect("tempdir");

    decider_sync()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("mode: disabled"));
}

#[test]
fn status_honours_path_override_and_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = dir.path().join("decider");

    decider_sync()
        .current_dir(dir.path())
        .env("DECIDER_GIT_REPO_URL", "git@git.code:foo/bar.git")
        .args(["status", "--repo-path"])
        .arg(&repo)
        .assert()
        .success()
        .stdout(contains("mode: push-enabled"))
        .stdout(contains("remote: git@git.code:foo/bar.git"))
        .stdout(contains("exists: no"));
}

#[test]
fn sha_without_repository_fails() {
    let dir = tempfile::tempdir().expect("tempdir");

    decider_sync()
        .current_dir(dir.path())
        .env("DECIDER_GIT_GIT_BIN", "/nonexistent/bin/git")
        .arg("sha")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("git unavailable"));
}

#[test]
fn disabled_commit_reads_stdin_and_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    if which::which("git").is_err() {
        return;
    }

    decider_sync()
        .current_dir(dir.path())
        .args(["commit", "--message", "noop"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(contains("synchronisation disabled"));
}
