use crate::common::command::{
    commit_file, committed_repository_dir, gitlet_add, gitlet_checkout, head_commit_id,
    log_commit_ids, run_gitlet_command,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

#[rstest]
fn checkout_file_restores_head_version(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    write_file(FileSpec::new(dir.join("a.txt"), "scribbles\n".to_string()));

    run_gitlet_command(dir, &["checkout", "--", "a.txt"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "alpha\n");
}

#[rstest]
fn checkout_file_from_an_abbreviated_commit(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "a.txt", "alpha two\n", "Update a");

    run_gitlet_command(dir, &["checkout", &first[..8], "--", "a.txt"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "alpha\n");
    assert_eq!(log_commit_ids(dir).len(), 3);
}

#[rstest]
#[case::unknown_commit("0000000000000000000000000000000000000000", "No commit with that id exists.")]
#[case::not_hex("zzzz", "No commit with that id exists.")]
fn checkout_file_from_a_missing_commit_fails(
    committed_repository_dir: TempDir,
    #[case] revision: &str,
    #[case] message: &str,
) {
    run_gitlet_command(committed_repository_dir.path(), &["checkout", revision, "--", "a.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(message));
}

#[rstest]
fn checkout_branch_materializes_its_snapshot(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_gitlet_command(dir, &["branch", "side"]).assert().success();
    commit_file(dir, "c.txt", "gamma\n", "Add c on master");

    gitlet_checkout(dir, "side");

    assert!(!dir.join("c.txt").exists());
    assert_eq!(read_file(&dir.join("a.txt")), "alpha\n");

    gitlet_checkout(dir, "master");
    assert_eq!(read_file(&dir.join("c.txt")), "gamma\n");
}

#[rstest]
fn checkout_branch_clears_the_staging_area(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_gitlet_command(dir, &["branch", "side"]).assert().success();
    write_file(FileSpec::new(dir.join("a.txt"), "staged\n".to_string()));
    gitlet_add(dir, &["a.txt"]);

    gitlet_checkout(dir, "side");

    assert_eq!(read_file(&dir.join("a.txt")), "alpha\n");
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Files ===\n\n"));
}

#[rstest]
fn checkout_branch_refuses_untracked_files(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_gitlet_command(dir, &["branch", "side"]).assert().success();
    write_file(FileSpec::new(dir.join("loose.txt"), "loose\n".to_string()));

    run_gitlet_command(dir, &["checkout", "side"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "There is an untracked file in the way; delete it, or add and commit it first.",
        ));

    assert_eq!(read_file(&dir.join("loose.txt")), "loose\n");
}

#[rstest]
#[case::missing_branch("nowhere", "No such branch exists.")]
#[case::current_branch("master", "No need to checkout the current branch.")]
fn checkout_branch_errors(
    committed_repository_dir: TempDir,
    #[case] branch: &str,
    #[case] message: &str,
) {
    run_gitlet_command(committed_repository_dir.path(), &["checkout", branch])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(message));
}

#[rstest]
fn reset_moves_the_branch_and_the_files(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "c.txt", "gamma\n", "Add c");
    commit_file(dir, "a.txt", "alpha two\n", "Update a");

    run_gitlet_command(dir, &["reset", &first]).assert().success();

    assert_eq!(head_commit_id(dir), first);
    assert!(!dir.join("c.txt").exists());
    assert_eq!(read_file(&dir.join("a.txt")), "alpha\n");
}

#[rstest]
fn reset_refuses_untracked_files(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "c.txt", "gamma\n", "Add c");
    write_file(FileSpec::new(dir.join("loose.txt"), "loose\n".to_string()));

    run_gitlet_command(dir, &["reset", &first])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("There is an untracked file in the way"));

    assert!(dir.join("c.txt").exists());
}

#[rstest]
fn reset_to_an_unknown_commit_fails(committed_repository_dir: TempDir) {
    run_gitlet_command(committed_repository_dir.path(), &["reset", "abcdef12"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No commit with that id exists."));
}
