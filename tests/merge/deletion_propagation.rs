use crate::common::command::{
    cat_node, link_of, pando_snapshot, read_head, run_pando_command, workspace_dir,
};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use rstest::rstest;

/// A deletion snapshotted on `b` propagates through the merge: the merged
/// tree excludes the file and it disappears from the working directory.
#[rstest]
fn deletion_propagation(workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = workspace_dir;

    run_pando_command(dir.path(), &["init"]).assert().success();
    write_file(FileSpec::new(dir.path().join("a.txt"), "keep".to_string()));
    write_file(FileSpec::new(dir.path().join("x.txt"), "drop".to_string()));
    run_pando_command(dir.path(), &["stage", "."])
        .assert()
        .success();
    pando_snapshot(dir.path(), "c1").assert().success();

    run_pando_command(dir.path(), &["branch", "b"])
        .assert()
        .success();
    run_pando_command(dir.path(), &["checkout", "b"])
        .assert()
        .success();

    delete_path(&dir.path().join("x.txt"));
    run_pando_command(dir.path(), &["stage", "x.txt"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "delete x").assert().success();

    run_pando_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    assert!(dir.path().join("x.txt").exists());

    run_pando_command(dir.path(), &["merge", "b"])
        .assert()
        .success();

    // merged tree excludes x.txt, and so does the workspace
    let head = read_head(dir.path(), "master").unwrap();
    let snapshot = cat_node(dir.path(), &head);
    let tree = cat_node(dir.path(), &link_of(&snapshot, "tree"));
    assert!(tree.get("a.txt").is_some());
    assert!(tree.get("x.txt").is_none());
    assert!(!dir.path().join("x.txt").exists());

    Ok(())
}
