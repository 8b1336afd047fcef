//! File object
//!
//! A file is an immutable leaf pairing a workspace-relative POSIX path with
//! a link to the raw content block. The content itself lives in the store
//! under the CID of its bytes; the file object only points at it.

use crate::artifacts::objects::cid::Cid;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct FileNode {
    /// Workspace-relative POSIX path.
    pub path: String,
    /// CID of the raw content block.
    pub link: Cid,
}
