use crate::common::command::{pando_snapshot, run_pando_command, workspace_dir};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use fake::Fake;
use fake::faker::lorem::en::{Word, Words};
use predicates::prelude::predicate;
use rstest::rstest;

/// Staging a directory stages every file below it, however deep.
#[rstest]
fn stage_directory_recursively(workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace_dir;

    run_pando_command(dir.path(), &["init"]).assert().success();

    let file_count = (3..=6).fake::<usize>();
    for i in 0..file_count {
        let name = format!("{}-{}.txt", Word().fake::<String>(), i);
        let content = Words(5..10).fake::<Vec<String>>().join(" ");
        write_file(FileSpec::new(dir.path().join("nested/deep").join(name), content));
    }

    run_pando_command(dir.path(), &["stage", "nested"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "{file_count} path(s) staged for snapshot"
        )));

    pando_snapshot(dir.path(), "bulk").assert().success();

    run_pando_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("workspace clean"));

    Ok(())
}
