//! Tests for the pull → write → commit path.

use super::super::*;
use crate::git::Git;
use crate::test_support::ScriptedRunner;
use rstest::rstest;

use super::fixtures::{REMOTE_URL, Scratch, git, scratch};

fn seeded_document(scratch: &Scratch, contents: &[u8]) -> Utf8PathBuf {
    let document = scratch.path.join(TRACKED_DOCUMENT);
    fs::write_document(&document, contents).expect("seed tracked document");
    document
}

#[rstest]
fn commit_pulls_before_writing_and_commits_after(git: Git<ScriptedRunner>, scratch: Scratch) {
    let document = seeded_document(&scratch, b"old");
    git.runner().watch_file(&document);
    git.runner().push_success();
    git.runner().push_output(Some(0), "[master 1a2b3c4] flip\n", "");
    let repo = RepoSync::new(
        RepoConfig::with_remote(scratch.path.as_str(), REMOTE_URL),
        &git,
    );

    let outcome = repo.commit(b"new", "flip").expect("commit should succeed");

    assert_eq!(outcome, CommitOutcome::Committed);
    let invocations = git.runner().invocations();
    let [pull, commit] = invocations.as_slice() else {
        panic!("expected pull then commit, got {invocations:?}");
    };
    assert_eq!(pull.subcommand().as_deref(), Some("pull"));
    assert_eq!(pull.observed.as_deref(), Some(b"old".as_slice()));
    assert_eq!(commit.subcommand().as_deref(), Some("commit"));
    assert_eq!(commit.observed.as_deref(), Some(b"new".as_slice()));
    assert_eq!(commit.dir.as_deref(), Some(scratch.path.as_path()));
}

#[rstest]
fn local_only_commit_skips_pull(git: Git<ScriptedRunner>, scratch: Scratch) {
    git.runner().push_success();
    let repo = RepoSync::new(RepoConfig::local(scratch.path.as_str()), &git);

    let outcome = repo.commit(b"{}", "msg").expect("commit should succeed");

    assert_eq!(outcome, CommitOutcome::Committed);
    assert_eq!(git.runner().subcommands(), ["commit"]);
    let written = fs::read_document(&scratch.path.join(TRACKED_DOCUMENT)).expect("read back");
    assert_eq!(written, b"{}");
}

#[rstest]
#[case::clean_tree(Some(1), "On branch master\nnothing to commit, working tree clean\n", "")]
#[case::untracked_only(Some(1), "nothing added to commit but untracked files present\n", "")]
#[case::reported_on_stderr(Some(1), "", "nothing to commit\n")]
fn nothing_to_commit_is_not_an_error(
    git: Git<ScriptedRunner>,
    scratch: Scratch,
    #[case] code: Option<i32>,
    #[case] stdout: &str,
    #[case] stderr: &str,
) {
    git.runner().push_output(code, stdout, stderr);
    let repo = RepoSync::new(RepoConfig::local(scratch.path.as_str()), &git);

    let outcome = repo.commit(b"same", "msg").expect("no-op commit should succeed");

    assert_eq!(outcome, CommitOutcome::NothingToCommit);
}

#[rstest]
#[case::nothing_to_commit("[master 1a2b3c4] nothing to commit fix\n")]
#[case::nothing_added("[master 1a2b3c4] revert: nothing added to commit guard\n")]
fn successful_commit_echoing_a_marker_is_committed(
    git: Git<ScriptedRunner>,
    scratch: Scratch,
    #[case] stdout: &str,
) {
    git.runner().push_output(Some(0), stdout, "");
    let repo = RepoSync::new(RepoConfig::local(scratch.path.as_str()), &git);

    let outcome = repo
        .commit(b"{}", "nothing to commit fix")
        .expect("commit should succeed");

    assert_eq!(outcome, CommitOutcome::Committed);
}

#[rstest]
fn commit_failure_reports_path_and_git_output(git: Git<ScriptedRunner>, scratch: Scratch) {
    git.runner().push_output(
        Some(128),
        "",
        "fatal: unable to auto-detect email address\n",
    );
    let repo = RepoSync::new(RepoConfig::local(scratch.path.as_str()), &git);

    let err = repo.commit(b"x", "msg").expect_err("commit should fail");

    let RepoError::Commit { ref path, ref output } = err else {
        panic!("expected Commit error, got {err:?}");
    };
    assert_eq!(path, &scratch.path);
    assert_eq!(output, "fatal: unable to auto-detect email address");
    let message = err.to_string();
    assert!(message.contains(scratch.path.as_str()), "{message}");
    assert!(message.contains("auto-detect email"), "{message}");
}

#[rstest]
fn commit_without_exit_status_is_terminated(git: Git<ScriptedRunner>, scratch: Scratch) {
    git.runner().push_missing_exit_code();
    let repo = RepoSync::new(RepoConfig::local(scratch.path.as_str()), &git);

    let err = repo.commit(b"x", "msg").expect_err("commit should fail");

    assert!(
        matches!(err, RepoError::Terminated { operation: "commit", .. }),
        "unexpected: {err:?}"
    );
}

#[rstest]
fn failed_pull_aborts_before_writing(git: Git<ScriptedRunner>, scratch: Scratch) {
    let document = seeded_document(&scratch, b"old");
    git.runner().push_output(
        Some(1),
        "",
        "fatal: Could not read from remote repository.\n",
    );
    let repo = RepoSync::new(
        RepoConfig::with_remote(scratch.path.as_str(), REMOTE_URL),
        &git,
    );

    let err = repo.commit(b"new", "msg").expect_err("commit should fail");

    let RepoError::PullBeforeCommit { ref url, ref source } = err else {
        panic!("expected PullBeforeCommit, got {err:?}");
    };
    assert_eq!(url, REMOTE_URL);
    assert_eq!(
        **source,
        RepoError::Pull {
            detail: String::from("fatal: Could not read from remote repository."),
        }
    );
    assert_eq!(git.runner().subcommands(), ["pull"]);
    assert_eq!(fs::read_document(&document).expect("read back"), b"old");
}

#[rstest]
fn write_failure_names_document_and_skips_commit(git: Git<ScriptedRunner>, scratch: Scratch) {
    let missing = scratch.path.join("not-created");
    let repo = RepoSync::new(RepoConfig::local(missing.as_str()), &git);

    let err = repo.commit(b"x", "msg").expect_err("write should fail");

    let RepoError::Write { ref path, .. } = err else {
        panic!("expected Write error, got {err:?}");
    };
    assert_eq!(path, &missing.join(TRACKED_DOCUMENT));
    assert!(git.runner().invocations().is_empty());
}

#[cfg(unix)]
#[rstest]
fn written_document_uses_default_mode(git: Git<ScriptedRunner>, scratch: Scratch) {
    use std::os::unix::fs::PermissionsExt;

    git.runner().push_success();
    let repo = RepoSync::new(RepoConfig::local(scratch.path.as_str()), &git);

    repo.commit(b"{}", "msg").expect("commit should succeed");

    let metadata = std::fs::metadata(scratch.path.join(TRACKED_DOCUMENT)).expect("metadata");
    assert_eq!(metadata.permissions().mode() & 0o777, DEFAULT_MODE);
}

#[test]
fn predicate_ignores_unrelated_failures() {
    let output = crate::git::CommandOutput {
        code: Some(1),
        stdout: String::new(),
        stderr: String::from("error: pathspec did not match"),
    };

    assert!(!indicates_nothing_to_commit(&output));
}
