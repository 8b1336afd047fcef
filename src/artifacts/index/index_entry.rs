//! Index entries
//!
//! Each tracked path carries a triple of optional CIDs bridging the three
//! places a file lives:
//!
//! - `wdir`: hash of the bytes currently on disk (absent if the file is
//!   gone)
//! - `stage`: hash of the last staged content (absent if unstaged, or if a
//!   deletion has been staged)
//! - `repo`: hash recorded in the most recent snapshot (absent if the path
//!   was never snapshotted)
//!
//! The classification predicates below drive the status sets and the
//! dirty-workspace guard.

use crate::artifacts::objects::cid::Cid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub wdir: Option<Cid>,
    pub stage: Option<Cid>,
    pub repo: Option<Cid>,
}

impl IndexEntry {
    /// A path is tracked once it has been staged or snapshotted.
    pub fn is_tracked(&self) -> bool {
        self.stage.is_some() || self.repo.is_some()
    }

    /// On disk but never staged nor snapshotted.
    pub fn is_untracked(&self) -> bool {
        !self.is_tracked() && self.wdir.is_some()
    }

    /// Content on disk differs from what was last staged (or snapshotted,
    /// for tracked paths that lost their stage entry). Untracked paths are
    /// never modified; a staged deletion is pending, not modified.
    pub fn is_modified(&self) -> bool {
        match (&self.stage, &self.repo) {
            (Some(stage), _) => self.wdir.as_ref() != Some(stage),
            (None, Some(repo)) => matches!(&self.wdir, Some(wdir) if wdir != repo),
            (None, None) => false,
        }
    }

    /// Staged but not yet snapshotted: either staged content differing from
    /// the snapshot, or a staged deletion of a snapshotted path.
    pub fn is_unsnapshot(&self) -> bool {
        match &self.stage {
            Some(stage) => self.repo.as_ref() != Some(stage),
            None => self.repo.is_some() && self.wdir.is_none(),
        }
    }

    /// Snapshotted path whose file no longer exists on disk.
    pub fn is_deleted(&self) -> bool {
        self.wdir.is_none() && self.repo.is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.wdir.is_some() && self.wdir == self.stage && self.stage == self.repo
    }
}
