//! Working directory adapter
//!
//! All paths are workspace-relative; the adapter joins them with the
//! configured root and refuses anything that would escape it. File writes
//! are atomic at file granularity (temp-file + rename). The workspace is
//! mutated only by checkout, merge, and the user.

use crate::artifacts::core::PandoError;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".pando", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Join a relative path with the workspace root, rejecting absolute
    /// paths and `..` components.
    fn resolve(&self, relative: &Path) -> anyhow::Result<PathBuf> {
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(PandoError::PathOutsideWorkspace(relative.to_path_buf()).into());
        }
        Ok(self.path.join(relative))
    }

    pub fn exists(&self, relative: &Path) -> bool {
        self.resolve(relative).map(|p| p.exists()).unwrap_or(false)
    }

    pub fn read(&self, relative: &Path) -> anyhow::Result<Bytes> {
        let path = self.resolve(relative)?;
        let content = std::fs::read(&path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        Ok(content.into())
    }

    /// Atomic write: the content lands under a temp name in the target
    /// directory and is renamed into place.
    pub fn write(&self, relative: &Path, content: &[u8]) -> anyhow::Result<()> {
        let path = self.resolve(relative)?;
        let parent = path.parent().context("workspace file has no parent")?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("unable to create directory {}", parent.display()))?;

        // a directory may be squatting on the target path after a kind flip
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("unable to clear directory {}", path.display()))?;
        }

        let temp_path = parent.join(format!(".pando-tmp-{}", rand::random::<u32>()));
        let mut file = std::fs::File::create(&temp_path)
            .with_context(|| format!("unable to create {}", temp_path.display()))?;
        file.write_all(content)
            .with_context(|| format!("unable to write {}", temp_path.display()))?;

        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("unable to publish {}", path.display()))?;

        Ok(())
    }

    /// Remove a file and prune any directories the removal left empty.
    pub fn remove(&self, relative: &Path) -> anyhow::Result<()> {
        let path = self.resolve(relative)?;

        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("unable to remove directory {}", path.display()))?;
        } else if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("unable to remove {}", path.display()))?;
        }

        self.prune_empty_parents(&path)?;
        Ok(())
    }

    fn prune_empty_parents(&self, path: &Path) -> anyhow::Result<()> {
        let mut cursor = path.parent();
        while let Some(parent) = cursor {
            if parent == self.path.as_ref() {
                break;
            }
            match parent.read_dir() {
                Ok(mut entries) => {
                    if entries.next().is_none() {
                        std::fs::remove_dir(parent)?;
                        cursor = parent.parent();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// All files under the workspace root, as sorted relative paths, with
    /// the metadata directory filtered out.
    pub fn walk(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(self.path.as_ref())
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();
        files.sort();
        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .map(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }
}
