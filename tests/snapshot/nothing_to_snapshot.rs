use crate::common::command::{init_workspace_dir, pando_snapshot, read_head};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// With nothing staged the snapshot is refused and the head stays put.
#[rstest]
fn nothing_to_snapshot(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;
    let head_before = read_head(dir.path(), "master");

    pando_snapshot(dir.path(), "empty")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nothing to snapshot"));

    assert_eq!(read_head(dir.path(), "master"), head_before);

    Ok(())
}
