use crate::common::command::{init_workspace_dir, read_head, run_pando_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// A new branch starts at the current head and shows up in the listing.
#[rstest]
fn create_and_list(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    assert_eq!(
        read_head(dir.path(), "feature"),
        read_head(dir.path(), "master")
    );

    run_pando_command(dir.path(), &["branch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feature"))
        .stdout(predicate::str::contains("* "));

    Ok(())
}

/// Branching off an empty workspace yields an empty branch.
#[rstest]
fn branch_from_empty_head() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_pando_command(dir.path(), &["init"]).assert().success();

    run_pando_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    assert_eq!(read_head(dir.path(), "feature"), None);

    Ok(())
}
