//! Shared error type for repository operations
//!
//! All failure modes that callers may need to distinguish are expressed as
//! variants of [`PandoError`]. Operations propagate them inside
//! `anyhow::Error` (with context attached along the way); the CLI downcasts
//! back to [`PandoError`] to pick an exit code.

use crate::artifacts::merge::ConflictKind;
use crate::artifacts::objects::cid::Cid;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Failure modes of the version control core.
#[derive(Debug, thiserror::Error)]
pub enum PandoError {
    #[error("no pando workspace found at {0}")]
    NotInitialized(PathBuf),

    #[error("workspace at {0} is already initialized")]
    AlreadyInitialized(PathBuf),

    #[error("unknown branch: {0}")]
    UnknownBranch(String),

    #[error("branch {0} already exists")]
    BranchExists(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("cannot delete the current branch {0}")]
    CannotDeleteCurrentBranch(String),

    /// Preflight failure of checkout/merge: the workspace holds changes that
    /// have not been snapshotted yet.
    #[error("workspace is dirty: {} modified, {} staged", modified.len(), unsnapshot.len())]
    DirtyWorkspace {
        modified: Vec<PathBuf>,
        unsnapshot: Vec<PathBuf>,
    },

    #[error("nothing to snapshot")]
    NothingToSnapshot,

    /// The merge was aborted cleanly; no snapshot was created and neither the
    /// workspace nor the index was touched.
    #[error("merge produced {} conflicting path(s)", paths.len())]
    MergeConflict { paths: BTreeMap<PathBuf, ConflictKind> },

    #[error("no common ancestor between {0} and {1}")]
    NoCommonAncestor(Cid, Cid),

    #[error("object {0} is corrupt: content does not match its CID")]
    CorruptObject(Cid),

    #[error("object {0} is not present in the store")]
    MissingObject(Cid),

    /// A staged path uses another staged file as a directory prefix.
    #[error("path component {0} is already a file")]
    PathIsFile(PathBuf),

    #[error("path {0} escapes the workspace root")]
    PathOutsideWorkspace(PathBuf),

    /// `@type` and `path` are reserved node keys and cannot name a path
    /// component.
    #[error("path component {0} is a reserved name")]
    ReservedComponent(String),

    #[error("the metadata lock is held by another process")]
    LockHeld,

    #[error("unknown object type: {0}")]
    UnknownType(String),

    #[error("object {kind} is missing field {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("malformed link in field {0}")]
    MalformedLink(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PandoError {
    /// CLI exit code for this failure, following the convention
    /// 1 = user error, 2 = merge conflict, 3 = internal error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PandoError::MergeConflict { .. } => 2,
            PandoError::NotInitialized(_)
            | PandoError::AlreadyInitialized(_)
            | PandoError::UnknownBranch(_)
            | PandoError::BranchExists(_)
            | PandoError::InvalidBranchName(_)
            | PandoError::CannotDeleteCurrentBranch(_)
            | PandoError::DirtyWorkspace { .. }
            | PandoError::NothingToSnapshot
            | PandoError::PathIsFile(_)
            | PandoError::PathOutsideWorkspace(_)
            | PandoError::ReservedComponent(_) => 1,
            _ => 3,
        }
    }
}
