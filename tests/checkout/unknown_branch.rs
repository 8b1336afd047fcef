use crate::common::command::{init_workspace_dir, run_pando_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn checking_out_an_unknown_branch_fails(
    init_workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["checkout", "ghost"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown branch"));

    Ok(())
}
