use crate::common::command::{
    init_workspace_dir, pando_snapshot, read_head, run_pando_command,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// `p` becomes a file on master and a directory on `b`: the merge reports
/// a type conflict for `p` and aborts.
#[rstest]
fn type_conflict(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "b"])
        .assert()
        .success();

    // master: p is a file
    write_file(FileSpec::new(dir.path().join("p"), "a file".to_string()));
    run_pando_command(dir.path(), &["stage", "p"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "p as file").assert().success();
    let master_head = read_head(dir.path(), "master").unwrap();

    // b: p is a directory containing q
    run_pando_command(dir.path(), &["checkout", "b"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("p/q"), "nested".to_string()));
    run_pando_command(dir.path(), &["stage", "p"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "p as dir").assert().success();

    run_pando_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();

    run_pando_command(dir.path(), &["merge", "b"])
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("CONFLICT (TypeConflict): p"));

    assert_eq!(read_head(dir.path(), "master").unwrap(), master_head);

    Ok(())
}
