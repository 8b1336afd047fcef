use crate::common::command::{init_workspace_dir, run_pando_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn report_modified_files(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    write_file(FileSpec::new(
        dir.path().join("a.txt"),
        "changed".to_string(),
    ));

    run_pando_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M a.txt"));

    Ok(())
}
