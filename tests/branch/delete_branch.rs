use crate::common::command::{init_workspace_dir, run_pando_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn delete_branch(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_pando_command(dir.path(), &["branch", "--delete", "feature"])
        .assert()
        .success();

    assert!(!dir.path().join(".pando/branches/feature").exists());

    Ok(())
}

#[rstest]
fn the_current_branch_cannot_be_deleted(
    init_workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "--delete", "master"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot delete the current branch"));

    assert!(dir.path().join(".pando/branches/master").exists());

    Ok(())
}
