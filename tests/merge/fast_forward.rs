use crate::common::command::{
    init_workspace_dir, pando_snapshot, read_head, run_pando_command,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Branch `b` is strictly ahead of master: merging moves the master head
/// onto `b`'s snapshot without creating a new one.
#[rstest]
fn fast_forward(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "b"])
        .assert()
        .success();
    run_pando_command(dir.path(), &["checkout", "b"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.path().join("b.txt"), "x".to_string()));
    run_pando_command(dir.path(), &["stage", "b.txt"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "m3").assert().success();
    let c3 = read_head(dir.path(), "b").unwrap();

    run_pando_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    assert!(!dir.path().join("b.txt").exists());

    run_pando_command(dir.path(), &["merge", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fast-forward"));

    // the head moved onto C3 itself, no merge snapshot was created
    assert_eq!(read_head(dir.path(), "master").unwrap(), c3);
    assert_eq!(read_file(&dir.path().join("b.txt")), "x");

    Ok(())
}
