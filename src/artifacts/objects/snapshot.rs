//! Snapshot object
//!
//! A snapshot records the state of the whole workspace at one point: a link
//! to the root tree, an ordered list of parent snapshots (empty for the
//! initial snapshot, one for ordinary snapshots, two for merges), plus
//! author, message and a display-only timestamp.

use crate::artifacts::objects::cid::Cid;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Snapshot {
    pub author: String,
    pub message: String,
    /// UNIX seconds; display only, never used for object identity decisions.
    pub timestamp: i64,
    /// Link to the root [`Tree`](crate::artifacts::objects::tree::Tree).
    pub tree: Cid,
    /// Ordered parent links; `parents[0]` is the branch the snapshot was
    /// created on, `parents[1]` the merged-in head for merge snapshots.
    pub parents: Vec<Cid>,
}

impl Snapshot {
    /// First line of the message, for one-line displays.
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}
