use crate::common::command::{init_workspace_dir, run_pando_command};
use crate::common::file::delete_path;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn report_deleted_files(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    delete_path(&dir.path().join("a.txt"));

    run_pando_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("D a.txt"));

    Ok(())
}
