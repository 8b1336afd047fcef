use crate::common::command::{
    init_workspace_dir, pando_snapshot, run_pando_command,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// A merge snapshot shows both parents and every ancestor appears once.
#[rstest]
fn merge_log(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "b"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.path().join("m.txt"), "M".to_string()));
    run_pando_command(dir.path(), &["stage", "m.txt"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "on master").assert().success();

    run_pando_command(dir.path(), &["checkout", "b"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("o.txt"), "O".to_string()));
    run_pando_command(dir.path(), &["stage", "o.txt"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "on b").assert().success();

    run_pando_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_pando_command(dir.path(), &["merge", "b"])
        .assert()
        .success();

    let output = run_pando_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged b into master"))
        .stdout(predicate::str::contains("Merge: "))
        .get_output()
        .stdout
        .clone();

    // the shared root snapshot is printed exactly once
    let rendered = String::from_utf8(output)?;
    assert_eq!(rendered.matches("    m1").count(), 1);

    Ok(())
}
