//! Repository facade
//!
//! `Repository` wires the per-workspace subsystems together: the object
//! store, the working directory, the index and the branch registry, plus
//! the author configuration and the coarse metadata lock. All state is
//! per-workspace — nothing process-global — so several repositories can
//! coexist in one process.
//!
//! ## Locking
//!
//! Every mutating operation (`stage`, `snapshot`, `checkout`, `merge`,
//! branch create/delete) holds the exclusive metadata lock for its whole
//! duration; read-only operations (`status`, `log`, `cat`) take it shared.
//! Acquisition blocks, with no implicit timeout.

use crate::artifacts::core::PandoError;
use crate::artifacts::objects::cid::Cid;
use crate::artifacts::objects::tree::Tree;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::store::Store;
use crate::areas::workspace::Workspace;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Metadata directory name.
pub const PANDO_DIR: &str = ".pando";

/// Object store backing directory name.
const STORE_DIR: &str = "ipfs";

/// Index file name.
const INDEX_FILE: &str = "index";

/// Config file name.
const CONFIG_FILE: &str = "config";

/// Metadata lock file name.
const LOCK_FILE: &str = "lock";

/// Branch the workspace starts on.
pub const DEFAULT_BRANCH: &str = "master";

/// Workspace configuration, persisted as YAML at `.pando/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub author: String,
}

/// Guard for the coarse metadata lock; dropping it releases the lock.
pub struct MetaLock {
    _guard: file_guard::FileGuard<Box<std::fs::File>>,
}

pub struct Repository {
    /// Workspace root path.
    path: Box<Path>,
    /// Output writer (stdout in the CLI, a buffer in tests).
    writer: RefCell<Box<dyn std::io::Write>>,
    /// Staging index with cooperative single-writer access.
    index: Arc<Mutex<Index>>,
    /// Content-addressable object store.
    store: Store,
    /// Working directory.
    workspace: Workspace,
    /// Branch registry.
    refs: Refs,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("unable to resolve workspace path {}", path.display()))?;
        let metadata = path.join(PANDO_DIR);

        let index = Index::new(metadata.join(INDEX_FILE).into_boxed_path());
        let store = Store::new(metadata.join(STORE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata.clone().into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            store,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(PANDO_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().exists()
    }

    pub fn require_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(PandoError::NotInitialized(self.path.to_path_buf()).into())
        }
    }

    /// Author for new snapshots: `PANDO_AUTHOR` overrides the config file.
    pub fn author(&self) -> anyhow::Result<String> {
        if let Ok(author) = std::env::var("PANDO_AUTHOR")
            && !author.is_empty()
        {
            return Ok(author);
        }
        Ok(self.config()?.author)
    }

    pub fn config(&self) -> anyhow::Result<Config> {
        let raw = std::fs::read_to_string(self.metadata_path().join(CONFIG_FILE))
            .context("unable to read workspace config")?;
        serde_yaml::from_str(&raw).context("unable to parse workspace config")
    }

    pub fn write_config(&self, config: &Config) -> anyhow::Result<()> {
        let rendered = serde_yaml::to_string(config)?;
        std::fs::write(self.metadata_path().join(CONFIG_FILE), rendered)
            .context("unable to write workspace config")
    }

    /// Exclusive metadata lock for mutating operations.
    pub fn lock_exclusive(&self) -> anyhow::Result<MetaLock> {
        self.acquire_lock(file_guard::Lock::Exclusive)
    }

    /// Shared metadata lock for read-only operations.
    pub fn lock_shared(&self) -> anyhow::Result<MetaLock> {
        self.acquire_lock(file_guard::Lock::Shared)
    }

    fn acquire_lock(&self, lock: file_guard::Lock) -> anyhow::Result<MetaLock> {
        let lock_path = self.metadata_path().join(LOCK_FILE);
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("unable to open lock file {}", lock_path.display()))?;

        let guard = file_guard::lock(Box::new(file), lock, 0, 1)
            .map_err(|_| PandoError::LockHeld)?;
        Ok(MetaLock { _guard: guard })
    }

    /// Root tree of a snapshot head, with `None` as the empty tree.
    pub fn root_tree(&self, head: Option<&Cid>) -> anyhow::Result<Tree> {
        match head {
            None => Ok(Tree::empty(".")),
            Some(cid) => {
                let snapshot = self.store.get_snapshot(cid)?;
                self.store.get_tree(&snapshot.tree)
            }
        }
    }
}
