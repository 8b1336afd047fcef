use crate::common::command::{init_workspace_dir, run_pando_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// Staging a path that never existed neither fails nor tracks anything.
#[rstest]
fn stage_missing_path_is_ignored(
    init_workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["stage", "ghost.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 path(s) staged"));

    run_pando_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("workspace clean"));

    Ok(())
}
