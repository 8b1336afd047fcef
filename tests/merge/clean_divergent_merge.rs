use crate::common::command::{
    cat_node, init_workspace_dir, link_of, pando_snapshot, read_head, run_pando_command,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Divergent branches with disjoint additions merge cleanly into a
/// snapshot carrying both heads as parents, in [current, other] order.
#[rstest]
fn clean_divergent_merge(init_workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_workspace_dir;

    run_pando_command(dir.path(), &["branch", "b"])
        .assert()
        .success();

    // C4 on master: add m.txt
    write_file(FileSpec::new(dir.path().join("m.txt"), "M".to_string()));
    run_pando_command(dir.path(), &["stage", "m.txt"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "m4").assert().success();
    let c4 = read_head(dir.path(), "master").unwrap();

    // C5 on b: add o.txt
    run_pando_command(dir.path(), &["checkout", "b"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("o.txt"), "O".to_string()));
    run_pando_command(dir.path(), &["stage", "o.txt"])
        .assert()
        .success();
    pando_snapshot(dir.path(), "m5").assert().success();
    let c5 = read_head(dir.path(), "b").unwrap();

    run_pando_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_pando_command(dir.path(), &["merge", "b"])
        .assert()
        .success();

    // a new merge snapshot with parents [C4, C5]
    let c6 = read_head(dir.path(), "master").unwrap();
    assert_ne!(c6, c4);
    let snapshot = cat_node(dir.path(), &c6);
    let parents: Vec<String> = snapshot["parents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["/"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(parents, vec![c4, c5]);

    // the merged root tree holds all three files
    let tree = cat_node(dir.path(), &link_of(&snapshot, "tree"));
    for name in ["a.txt", "m.txt", "o.txt"] {
        assert!(tree.get(name).is_some(), "merged tree should hold {name}");
    }

    // and the workspace matches
    assert_eq!(read_file(&dir.path().join("a.txt")), "hello");
    assert_eq!(read_file(&dir.path().join("m.txt")), "M");
    assert_eq!(read_file(&dir.path().join("o.txt")), "O");

    // the current branch kept its identity
    let current = std::fs::read_to_string(dir.path().join(".pando/current"))?;
    assert!(current.contains("master"));

    Ok(())
}
