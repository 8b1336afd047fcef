use crate::common::command::{
    cat_node, init_workspace_dir, link_of, pando_snapshot, read_head, run_pando_command,
};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use rstest::rstest;

/// Deleting a snapshotted file, staging the deletion and snapshotting
/// yields a tree without the file.
#[rstest]
fn snapshot_records_deletions(
    init_workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    write_file(FileSpec::new(dir.path().join("b.txt"), "beta".to_string()));
    run_pando_command(dir.path(), &["stage", "."])
        .assert()
        .success();
    pando_snapshot(dir.path(), "add b").assert().success();

    delete_path(&dir.path().join("b.txt"));
    run_pando_command(dir.path(), &["stage", "b.txt"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "drop b").assert().success();

    let head = read_head(dir.path(), "master").unwrap();
    let snapshot = cat_node(dir.path(), &head);
    let tree = cat_node(dir.path(), &link_of(&snapshot, "tree"));

    assert!(tree.get("a.txt").is_some());
    assert!(tree.get("b.txt").is_none());

    Ok(())
}
