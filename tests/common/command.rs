use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use serde_json::Value;
use std::path::Path;

/// A fresh temporary workspace, not yet initialized.
#[fixture]
pub fn workspace_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A workspace with one snapshot on master: `a.txt` containing "hello".
#[fixture]
pub fn init_workspace_dir(workspace_dir: TempDir) -> TempDir {
    run_pando_command(workspace_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        workspace_dir.path().join("a.txt"),
        "hello".to_string(),
    ));

    run_pando_command(workspace_dir.path(), &["stage", "a.txt"])
        .assert()
        .success();
    pando_snapshot(workspace_dir.path(), "m1").assert().success();

    workspace_dir
}

pub fn run_pando_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("pando").expect("Failed to find pando binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn pando_snapshot(dir: &Path, message: &str) -> Command {
    let mut cmd = run_pando_command(dir, &["snapshot", "-m", message]);
    cmd.env("PANDO_AUTHOR", "tester");
    cmd
}

/// Head CID of a branch, read from its on-disk YAML scalar.
pub fn read_head(dir: &Path, branch: &str) -> Option<String> {
    let raw = std::fs::read_to_string(dir.join(".pando/branches").join(branch))
        .expect("branch file should exist");
    let head: Option<String> = serde_yaml::from_str(&raw).expect("branch file should be YAML");
    head
}

/// Decode a stored object into its node form via `pando cat`.
pub fn cat_node(dir: &Path, cid: &str) -> Value {
    let output = run_pando_command(dir, &["cat", cid])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("cat should print a JSON node")
}

/// Follow a link field (`{"/": cid}`) of a node.
pub fn link_of(node: &Value, field: &str) -> String {
    node.get(field)
        .and_then(|link| link.get("/"))
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("node has no link field {field}"))
        .to_string()
}

/// CID of raw content, matching the store's hashing.
pub fn content_cid(content: &str) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(content.as_bytes()))
}
