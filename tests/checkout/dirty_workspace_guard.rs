use crate::common::command::{
    init_workspace_dir, pando_snapshot, run_pando_command,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// A modified tracked file blocks checkout before anything is touched.
#[rstest]
fn modified_file_blocks_checkout(
    init_workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "b"])
        .assert()
        .success();

    write_file(FileSpec::new(
        dir.path().join("a.txt"),
        "dirty edit".to_string(),
    ));

    run_pando_command(dir.path(), &["checkout", "b"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("dirty"));

    // nothing moved: same branch, same content
    assert_eq!(read_file(&dir.path().join("a.txt")), "dirty edit");
    let current = std::fs::read_to_string(dir.path().join(".pando/current"))?;
    assert!(current.contains("master"));

    Ok(())
}

/// Staged-but-unsnapshotted content blocks checkout and merge alike.
#[rstest]
fn staged_content_blocks_checkout_and_merge(
    init_workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "b"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.path().join("new.txt"), "n".to_string()));
    run_pando_command(dir.path(), &["stage", "new.txt"])
        .assert()
        .success();

    run_pando_command(dir.path(), &["checkout", "b"])
        .assert()
        .failure()
        .code(1);
    run_pando_command(dir.path(), &["merge", "b"])
        .assert()
        .failure()
        .code(1);

    Ok(())
}

/// Untracked scratch files do not block switching branches.
#[rstest]
fn untracked_files_do_not_block_checkout(
    init_workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
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
    pando_snapshot(dir.path(), "on b").assert().success();

    write_file(FileSpec::new(
        dir.path().join("scratch.txt"),
        "untracked".to_string(),
    ));

    run_pando_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();

    // the scratch file survived the switch
    assert_eq!(read_file(&dir.path().join("scratch.txt")), "untracked");

    Ok(())
}
