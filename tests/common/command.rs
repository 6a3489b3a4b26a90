use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temporary directory")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// A repository whose master branch holds `a.txt` and `b.txt` in one commit
#[fixture]
pub fn committed_repository_dir(init_repository_dir: TempDir) -> TempDir {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("a.txt"), "alpha\n".to_string()));
    write_file(FileSpec::new(dir.join("b.txt"), "beta\n".to_string()));
    gitlet_add(dir, &["a.txt", "b.txt"]);
    gitlet_commit(dir, "Add a and b").assert().success();

    init_repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find the gitlet binary");
    cmd.current_dir(dir);
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.args(args);
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_gitlet_command(dir, &["commit", message]);
    cmd.env("GITLET_COMMIT_DATE", COMMIT_DATE);
    cmd
}

pub fn gitlet_add(dir: &Path, files: &[&str]) {
    for file in files {
        run_gitlet_command(dir, &["add", file]).assert().success();
    }
}

/// Write `content` to `name`, stage it and commit it
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    gitlet_add(dir, &[name]);
    gitlet_commit(dir, message).assert().success();
}

pub fn gitlet_checkout(dir: &Path, branch: &str) {
    run_gitlet_command(dir, &["checkout", branch])
        .assert()
        .success();
}

/// Every commit ID printed by `log`, newest first
pub fn log_commit_ids(dir: &Path) -> Vec<String> {
    let output = run_gitlet_command(dir, &["log"]).assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();

    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}

pub fn head_commit_id(dir: &Path) -> String {
    log_commit_ids(dir)
        .into_iter()
        .next()
        .expect("log printed no commit")
}
