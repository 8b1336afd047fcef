//! Core object types
//!
//! Every durable value in the system is one of three object kinds:
//!
//! - `snapshot`: an immutable record of a root tree plus parent links
//! - `tree`: an immutable directory mapping child names to links
//! - `file`: an immutable leaf referring to a raw content block
//!
//! Objects are carried as a tagged [`Object`] enum and matched exhaustively
//! at the codec boundary; nothing ever inspects fields structurally to guess
//! a type.

use crate::artifacts::core::PandoError;
use crate::artifacts::objects::file::FileNode;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::objects::tree::Tree;

/// Tag carried in the reserved `@type` key of every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Snapshot,
    Tree,
    File,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Snapshot => "snapshot",
            ObjectKind::Tree => "tree",
            ObjectKind::File => "file",
        }
    }

    pub fn try_parse(tag: &str) -> anyhow::Result<Self> {
        match tag {
            "snapshot" => Ok(ObjectKind::Snapshot),
            "tree" => Ok(ObjectKind::Tree),
            "file" => Ok(ObjectKind::File),
            other => Err(PandoError::UnknownType(other.to_string()).into()),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tagged container for a decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Snapshot(Snapshot),
    Tree(Tree),
    File(FileNode),
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Snapshot(_) => ObjectKind::Snapshot,
            Object::Tree(_) => ObjectKind::Tree,
            Object::File(_) => ObjectKind::File,
        }
    }

    pub fn into_snapshot(self) -> anyhow::Result<Snapshot> {
        match self {
            Object::Snapshot(snapshot) => Ok(snapshot),
            other => Err(PandoError::UnknownType(format!(
                "expected snapshot, found {}",
                other.kind()
            ))
            .into()),
        }
    }

    pub fn into_tree(self) -> anyhow::Result<Tree> {
        match self {
            Object::Tree(tree) => Ok(tree),
            other => Err(PandoError::UnknownType(format!(
                "expected tree, found {}",
                other.kind()
            ))
            .into()),
        }
    }

    pub fn into_file(self) -> anyhow::Result<FileNode> {
        match self {
            Object::File(file) => Ok(file),
            other => Err(PandoError::UnknownType(format!(
                "expected file, found {}",
                other.kind()
            ))
            .into()),
        }
    }
}
