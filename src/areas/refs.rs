//! Branch registry
//!
//! Branches are named mutable pointers to snapshot CIDs. Each branch lives
//! in its own YAML file under `.pando/branches/<name>`; an empty branch
//! holds YAML `null` (`Option<Cid>` end to end — there is no magic sentinel
//! string). `.pando/current` names the branch the workspace is on.
//!
//! Head updates take an exclusive lock on the branch file; the coarse
//! metadata lock in the repository facade serializes whole operations.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::PandoError;
use crate::artifacts::objects::cid::Cid;
use anyhow::Context;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

const BRANCHES_DIR: &str = "branches";
const CURRENT_FILE: &str = "current";

#[derive(Debug)]
pub struct Refs {
    /// Metadata directory (typically `.pando`).
    path: Box<Path>,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs { path }
    }

    fn branches_path(&self) -> std::path::PathBuf {
        self.path.join(BRANCHES_DIR)
    }

    fn branch_path(&self, name: &BranchName) -> std::path::PathBuf {
        self.branches_path().join(name.as_ref())
    }

    fn current_path(&self) -> std::path::PathBuf {
        self.path.join(CURRENT_FILE)
    }

    pub fn exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).exists()
    }

    /// Create a branch, optionally seeded with a head.
    pub fn create(&self, name: &BranchName, head: Option<&Cid>) -> anyhow::Result<()> {
        if self.exists(name) {
            return Err(PandoError::BranchExists(name.to_string()).into());
        }
        self.write_head_file(name, head)
    }

    /// Head of a branch; `None` for an empty branch.
    pub fn head(&self, name: &BranchName) -> anyhow::Result<Option<Cid>> {
        let path = self.branch_path(name);
        if !path.exists() {
            return Err(PandoError::UnknownBranch(name.to_string()).into());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("unable to read branch file {}", path.display()))?;
        let head: Option<Cid> = serde_yaml::from_str(&content)
            .with_context(|| format!("unable to parse branch file {}", path.display()))?;
        Ok(head)
    }

    pub fn set_head(&self, name: &BranchName, head: &Cid) -> anyhow::Result<()> {
        if !self.exists(name) {
            return Err(PandoError::UnknownBranch(name.to_string()).into());
        }
        self.write_head_file(name, Some(head))
    }

    fn write_head_file(&self, name: &BranchName, head: Option<&Cid>) -> anyhow::Result<()> {
        let path = self.branch_path(name);
        std::fs::create_dir_all(self.branches_path())?;

        let mut branch_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("unable to open branch file {}", path.display()))?;
        let mut lock = file_guard::lock(&mut branch_file, file_guard::Lock::Exclusive, 0, 1)?;
        let rendered = serde_yaml::to_string(&head)?;
        lock.deref_mut().write_all(rendered.as_bytes())?;

        Ok(())
    }

    pub fn list(&self) -> anyhow::Result<Vec<BranchName>> {
        let mut branches = WalkDir::new(self.branches_path())
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                BranchName::try_parse(entry.file_name().to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();
        Ok(branches)
    }

    /// Delete a branch; refused for the current branch.
    pub fn delete(&self, name: &BranchName) -> anyhow::Result<()> {
        if name == &self.current()? {
            return Err(PandoError::CannotDeleteCurrentBranch(name.to_string()).into());
        }
        if !self.exists(name) {
            return Err(PandoError::UnknownBranch(name.to_string()).into());
        }

        std::fs::remove_file(self.branch_path(name))
            .with_context(|| format!("unable to delete branch {name}"))?;
        Ok(())
    }

    /// Name of the current branch.
    pub fn current(&self) -> anyhow::Result<BranchName> {
        let content = std::fs::read_to_string(self.current_path())
            .with_context(|| "unable to read the current-branch pointer")?;
        let name: String = serde_yaml::from_str(&content)?;
        BranchName::try_parse(name)
    }

    /// Point the workspace at another (existing) branch.
    pub fn set_current(&self, name: &BranchName) -> anyhow::Result<()> {
        if !self.exists(name) {
            return Err(PandoError::UnknownBranch(name.to_string()).into());
        }

        let rendered = serde_yaml::to_string(name.as_ref())?;
        std::fs::write(self.current_path(), rendered)
            .with_context(|| "unable to update the current-branch pointer")?;
        Ok(())
    }

    /// Head of the current branch.
    pub fn current_head(&self) -> anyhow::Result<Option<Cid>> {
        self.head(&self.current()?)
    }
}
