use crate::common::command::{init_workspace_dir, run_pando_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn clean_workspace_prints_nothing_to_snapshot(
    init_workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("On branch master"))
        .stdout(predicate::str::contains("nothing to snapshot, workspace clean"));

    Ok(())
}
