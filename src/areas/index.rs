//! Staging index
//!
//! The index bridges the working directory and the snapshot history: for
//! every path it remembers the `wdir` / `stage` / `repo` CID triple. It is
//! the only mutable process-local state besides the branch files and is
//! persisted as a flat YAML mapping at `.pando/index` between invocations.
//!
//! ## Life cycle
//!
//! `rehydrate` loads the persisted mapping, `update` rescans the working
//! directory (recomputing `wdir` hashes while preserving `stage` and
//! `repo`), mutating operations adjust entries, and `write_updates` saves
//! the mapping back atomically.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::cid::Cid;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::StatusReport;
use crate::areas::store::Store;
use crate::areas::workspace::Workspace;
use anyhow::Context;
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.pando/index`).
    path: Box<Path>,
    /// Tracked and observed paths mapped to their CID triples.
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Set when the in-memory state diverges from the persisted file.
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &IndexEntry)> {
        self.entries.iter()
    }

    /// Load the persisted mapping from disk.
    ///
    /// Takes a shared lock on the index file for the duration of the read.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            std::fs::File::create(&self.path)
                .with_context(|| format!("unable to create index at {}", self.path.display()))?;
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mapping: BTreeMap<String, IndexEntry> = serde_yaml::from_reader(lock.deref_mut())
            .with_context(|| format!("unable to parse index at {}", self.path.display()))?;
        self.entries = mapping
            .into_iter()
            .map(|(path, entry)| (PathBuf::from(path), entry))
            .collect();

        Ok(())
    }

    /// Persist the mapping, atomically (temp-file + rename) under an
    /// exclusive lock on the index file.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        let _lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mapping: BTreeMap<String, &IndexEntry> = self
            .entries
            .iter()
            .map(|(path, entry)| (path.to_string_lossy().replace('\\', "/"), entry))
            .collect();

        let parent = self.path.parent().context("index file has no parent")?;
        let temp_path = parent.join(format!(".index-tmp-{}", rand::random::<u32>()));
        let mut temp_file = std::fs::File::create(&temp_path)?;
        serde_yaml::to_writer(&mut temp_file, &mapping)?;
        temp_file.flush()?;
        std::fs::rename(&temp_path, &self.path)?;

        self.changed = false;
        Ok(())
    }

    /// Rescan the working directory, recomputing every `wdir` hash while
    /// preserving `stage` and `repo`. Returns the derived status sets.
    pub fn update(&mut self, workspace: &Workspace) -> anyhow::Result<StatusReport> {
        let on_disk = workspace.walk()?;

        // recompute hashes for everything currently on disk
        for path in &on_disk {
            let bytes = workspace.read(path)?;
            let wdir = Cid::for_bytes(&bytes);
            self.entries.entry(path.clone()).or_default().wdir = Some(wdir);
        }

        // paths with an entry but no file: mark absent, forget pure ghosts
        let on_disk: std::collections::BTreeSet<_> = on_disk.into_iter().collect();
        self.entries.retain(|path, entry| {
            if !on_disk.contains(path) {
                entry.wdir = None;
            }
            entry.wdir.is_some() || entry.is_tracked()
        });

        self.changed = true;
        Ok(self.report())
    }

    /// Stage one concrete file path.
    ///
    /// Present on disk: the bytes are put into the store as a raw block and
    /// `stage` records their CID. Missing but snapshotted: the deletion is
    /// staged by clearing `stage`. Missing and never snapshotted: a stale
    /// staged add is dropped, anything else is ignored.
    pub fn stage(
        &mut self,
        path: &Path,
        workspace: &Workspace,
        store: &Store,
    ) -> anyhow::Result<()> {
        if workspace.exists(path) {
            let bytes = workspace.read(path)?;
            let blob = store.put_block(&bytes)?;
            let entry = self.entries.entry(path.to_path_buf()).or_default();
            entry.wdir = Some(blob.clone());
            entry.stage = Some(blob);
            self.changed = true;
            return Ok(());
        }

        match self.entries.get_mut(path) {
            Some(entry) if entry.repo.is_some() => {
                entry.wdir = None;
                entry.stage = None;
                self.changed = true;
            }
            Some(entry) if entry.stage.is_some() => {
                self.entries.remove(path);
                self.changed = true;
            }
            _ => {}
        }

        Ok(())
    }

    /// Replace the index from a tree: every file in it becomes a clean
    /// entry with `repo == stage == wdir == file.link`. Called by checkout
    /// and merge after the working directory has been reconciled.
    pub fn reinitialize(&mut self, tree: &Tree, store: &Store) -> anyhow::Result<()> {
        let files = store.flatten_tree(tree)?;

        self.entries = files
            .into_iter()
            .map(|(path, blob)| {
                (
                    path,
                    IndexEntry {
                        wdir: Some(blob.clone()),
                        stage: Some(blob.clone()),
                        repo: Some(blob),
                    },
                )
            })
            .collect();
        self.changed = true;

        Ok(())
    }

    /// After a snapshot: the staged state becomes the snapshotted state.
    /// Staged deletions drop out of the index entirely.
    pub fn absorb_snapshot(&mut self) {
        self.entries.retain(|_, entry| {
            if entry.stage.is_some() {
                entry.repo = entry.stage.clone();
                true
            } else {
                // staged deletion: the path is gone from the new snapshot
                !entry.is_deleted()
            }
        });
        self.changed = true;
    }

    /// Derive the current status sets.
    pub fn report(&self) -> StatusReport {
        let mut report = StatusReport::default();

        for (path, entry) in &self.entries {
            if entry.is_unsnapshot() {
                report.unsnapshot.push(path.clone());
            }
            if entry.is_modified() {
                report.modified.push(path.clone());
            }
            if entry.is_deleted() {
                report.deleted.push(path.clone());
            }
            if entry.is_untracked() {
                report.untracked.push(path.clone());
            }
        }

        report
    }

    /// Paths with staged content, in tree-builder form `(path, blob CID)`.
    pub fn staged_files(&self) -> impl Iterator<Item = (&PathBuf, &Cid)> {
        self.entries
            .iter()
            .filter_map(|(path, entry)| entry.stage.as_ref().map(|stage| (path, stage)))
    }
}
