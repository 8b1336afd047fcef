//! Tree object and tree builder
//!
//! Trees are immutable directory snapshots: a mapping from child name (one
//! path component) to a link, where the link carries the child CID and its
//! kind (file or subtree). Child ordering is irrelevant for semantics but
//! the canonical encoding sorts names, so inserting children in any order
//! yields the same CID.
//!
//! [`TreeBuilder`] materializes a tree from staged index entries: paths are
//! split into components, intermediate trees are created on demand, and a
//! path may never be both a file and a directory prefix.

use crate::artifacts::core::PandoError;
use crate::artifacts::objects::cid::Cid;
use crate::artifacts::objects::file::FileNode;
use crate::artifacts::objects::node;
use crate::artifacts::objects::object::ObjectKind;
use crate::areas::store::Store;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::{Component, Path};

/// Link to a child object: CID plus kind tag.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Link {
    pub cid: Cid,
    pub kind: ObjectKind,
}

/// Immutable directory object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    /// Workspace-relative POSIX path; `.` for the root tree.
    pub path: String,
    /// Children keyed by single path component.
    pub children: BTreeMap<String, Link>,
}

impl Tree {
    pub fn empty(path: impl Into<String>) -> Self {
        Tree {
            path: path.into(),
            children: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&Link> {
        self.children.get(name)
    }
}

/// In-progress tree node while building from the index.
#[derive(Debug, Clone)]
enum DraftNode {
    File(Cid),
    Dir(BTreeMap<String, DraftNode>),
}

/// Builds a [`Tree`] hierarchy from flat `(path, blob CID)` pairs and writes
/// it to the store bottom-up.
///
/// Deleted paths are simply never inserted, which is what makes a deletion
/// land in the next snapshot.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: BTreeMap<String, DraftNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a staged file at `path` pointing at the raw block `blob`.
    ///
    /// Fails with `PathIsFile` when a component of `path` is already a file,
    /// or `path` itself is already a directory prefix of an earlier insert.
    pub fn insert(&mut self, path: &Path, blob: Cid) -> anyhow::Result<()> {
        let components = split_components(path)?;
        let (leaf, parents) = components
            .split_last()
            .ok_or_else(|| PandoError::PathOutsideWorkspace(path.to_path_buf()))?;

        let mut cursor = &mut self.root;
        let mut walked = Vec::new();
        for component in parents {
            walked.push(component.clone());
            let entry = cursor
                .entry(component.clone())
                .or_insert_with(|| DraftNode::Dir(BTreeMap::new()));
            match entry {
                DraftNode::Dir(children) => cursor = children,
                DraftNode::File(_) => {
                    return Err(PandoError::PathIsFile(walked.join("/").into()).into());
                }
            }
        }

        match cursor.get(leaf) {
            Some(DraftNode::Dir(_)) => {
                Err(PandoError::PathIsFile(path.to_path_buf()).into())
            }
            _ => {
                cursor.insert(leaf.clone(), DraftNode::File(blob));
                Ok(())
            }
        }
    }

    /// Write the tree hierarchy to the store, children before parents, and
    /// return the root tree CID.
    pub fn write(self, store: &Store) -> anyhow::Result<Cid> {
        write_dir(store, ".", &self.root)
    }
}

fn write_dir(
    store: &Store,
    path: &str,
    entries: &BTreeMap<String, DraftNode>,
) -> anyhow::Result<Cid> {
    let mut children = BTreeMap::new();

    for (name, draft) in entries {
        let child_path = join_path(path, name);
        let link = match draft {
            DraftNode::File(blob) => {
                let file = FileNode::new(child_path, blob.clone());
                Link::new(store.put_file(&file)?, ObjectKind::File)
            }
            DraftNode::Dir(nested) => {
                Link::new(write_dir(store, &child_path, nested)?, ObjectKind::Tree)
            }
        };
        children.insert(name.clone(), link);
    }

    store.put_tree(&Tree {
        path: path.to_string(),
        children,
    })
}

/// Join a parent tree path and a child component, keeping the root as `.`.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent == "." {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Split a workspace-relative path into validated components.
///
/// Rejects absolute paths, `..`, and the reserved node keys.
pub fn split_components(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy().to_string();
                if node::RESERVED_KEYS.contains(&name.as_str()) {
                    return Err(PandoError::ReservedComponent(name).into());
                }
                components.push(name);
            }
            Component::CurDir => {}
            _ => return Err(PandoError::PathOutsideWorkspace(path.to_path_buf()).into()),
        }
    }
    Ok(components)
}
