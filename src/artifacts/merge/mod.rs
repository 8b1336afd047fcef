//! Three-way recursive tree merge
//!
//! Merges two descendant trees against their lowest common ancestor. The
//! walk covers the union of child names at every level; per name the
//! base/origin/dest presence and CID equality decide the outcome:
//!
//! | base | origin | dest | result |
//! |------|--------|------|--------|
//! | -    | -      | d    | take d |
//! | -    | o      | -    | take o |
//! | -    | o      | d    | equal CIDs, else add/add conflict |
//! | l    | = l    | = l  | unchanged |
//! | l    | = l    | ≠ l  | take d |
//! | l    | ≠ l    | = l  | take o |
//! | l    | ≠ l    | ≠ l  | equal CIDs, else recurse / text merge |
//! | l    | -      | = l  | delete |
//! | l    | = l    | -    | delete |
//! | l    | -      | ≠ l  | modify/delete conflict |
//! | l    | ≠ l    | -    | modify/delete conflict |
//! | l    | -      | -    | delete |
//!
//! A kind mismatch (file vs tree) between two present, non-identical sides
//! is a type conflict. Recursive results replace the child entry in the
//! parent merged tree; a subtree merged down to nothing is omitted, which
//! propagates directory deletions.
//!
//! The merged tree is built bottom-up in the store. On conflict the caller
//! discards the outcome; partially written nodes are unreferenced blobs and
//! harmless.

pub mod text;

use crate::artifacts::objects::cid::Cid;
use crate::artifacts::objects::file::FileNode;
use crate::artifacts::objects::object::ObjectKind;
use crate::artifacts::objects::tree::{Link, Tree, join_path};
use crate::areas::store::Store;
use derive_new::new;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// What went wrong at a conflicting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConflictKind {
    /// The textual merge of a file reported overlapping changes.
    TextConflict,
    /// File on one side, directory on the other.
    TypeConflict,
    /// Added independently on both sides with different content.
    AddAdd,
    /// Modified on one side, deleted on the other.
    ModDel,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConflictKind::TextConflict => "TextConflict",
            ConflictKind::TypeConflict => "TypeConflict",
            ConflictKind::AddAdd => "AddAdd",
            ConflictKind::ModDel => "ModDel",
        };
        write!(f, "{name}")
    }
}

/// Outcome of a tree merge: a stored merged tree, or the conflict set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Clean { tree: Cid },
    Conflicted { paths: BTreeMap<PathBuf, ConflictKind> },
}

#[derive(new)]
pub struct MergeEngine<'r> {
    store: &'r Store,
}

impl MergeEngine<'_> {
    /// Merge `dest` into `origin` against `base` and store the merged tree.
    pub fn merge_trees(
        &self,
        origin: &Tree,
        dest: &Tree,
        base: &Tree,
    ) -> anyhow::Result<MergeOutcome> {
        let mut conflicts = BTreeMap::new();
        let merged = self.merge_level(".", origin, dest, base, &mut conflicts)?;

        if conflicts.is_empty() {
            Ok(MergeOutcome::Clean {
                tree: self.store.put_tree(&merged)?,
            })
        } else {
            Ok(MergeOutcome::Conflicted { paths: conflicts })
        }
    }

    fn merge_level(
        &self,
        path: &str,
        origin: &Tree,
        dest: &Tree,
        base: &Tree,
        conflicts: &mut BTreeMap<PathBuf, ConflictKind>,
    ) -> anyhow::Result<Tree> {
        let names: BTreeSet<&String> = origin
            .children
            .keys()
            .chain(dest.children.keys())
            .chain(base.children.keys())
            .collect();

        let mut children = BTreeMap::new();
        for name in names {
            let child_path = join_path(path, name);
            let merged = self.merge_entry(
                &child_path,
                base.child(name),
                origin.child(name),
                dest.child(name),
                conflicts,
            )?;
            if let Some(link) = merged {
                children.insert(name.clone(), link);
            }
        }

        Ok(Tree {
            path: path.to_string(),
            children,
        })
    }

    fn merge_entry(
        &self,
        path: &str,
        base: Option<&Link>,
        origin: Option<&Link>,
        dest: Option<&Link>,
        conflicts: &mut BTreeMap<PathBuf, ConflictKind>,
    ) -> anyhow::Result<Option<Link>> {
        match (base, origin, dest) {
            (None, None, None) => Ok(None),

            // one-sided additions
            (None, None, Some(d)) => Ok(Some(d.clone())),
            (None, Some(o), None) => Ok(Some(o.clone())),

            // added on both sides
            (None, Some(o), Some(d)) => {
                if o.cid == d.cid {
                    Ok(Some(o.clone()))
                } else if o.kind != d.kind {
                    conflicts.insert(PathBuf::from(path), ConflictKind::TypeConflict);
                    Ok(None)
                } else {
                    conflicts.insert(PathBuf::from(path), ConflictKind::AddAdd);
                    Ok(None)
                }
            }

            // deleted on one or both sides
            (Some(_), None, None) => Ok(None),
            (Some(l), None, Some(d)) => {
                if d.cid == l.cid {
                    Ok(None)
                } else {
                    conflicts.insert(PathBuf::from(path), ConflictKind::ModDel);
                    Ok(None)
                }
            }
            (Some(l), Some(o), None) => {
                if o.cid == l.cid {
                    Ok(None)
                } else {
                    conflicts.insert(PathBuf::from(path), ConflictKind::ModDel);
                    Ok(None)
                }
            }

            // present everywhere
            (Some(l), Some(o), Some(d)) => {
                if o.cid == l.cid && d.cid == l.cid {
                    Ok(Some(o.clone()))
                } else if o.cid == l.cid {
                    Ok(Some(d.clone()))
                } else if d.cid == l.cid {
                    Ok(Some(o.clone()))
                } else if o.cid == d.cid {
                    Ok(Some(o.clone()))
                } else if o.kind != d.kind {
                    conflicts.insert(PathBuf::from(path), ConflictKind::TypeConflict);
                    Ok(None)
                } else if o.kind == ObjectKind::Tree {
                    self.merge_subtrees(path, l, o, d, conflicts)
                } else {
                    self.merge_files(path, Some(l), o, d, conflicts)
                }
            }
        }
    }

    /// Both sides changed the same directory: recurse, replacing the child
    /// entry with the merged subtree (or dropping it when nothing is left).
    fn merge_subtrees(
        &self,
        path: &str,
        base: &Link,
        origin: &Link,
        dest: &Link,
        conflicts: &mut BTreeMap<PathBuf, ConflictKind>,
    ) -> anyhow::Result<Option<Link>> {
        let origin_tree = self.store.get_tree(&origin.cid)?;
        let dest_tree = self.store.get_tree(&dest.cid)?;
        // a base that is not a directory contributes nothing below this name
        let base_tree = if base.kind == ObjectKind::Tree {
            self.store.get_tree(&base.cid)?
        } else {
            Tree::empty(path)
        };

        let merged = self.merge_level(path, &origin_tree, &dest_tree, &base_tree, conflicts)?;
        if merged.is_empty() {
            return Ok(None);
        }

        Ok(Some(Link::new(
            self.store.put_tree(&merged)?,
            ObjectKind::Tree,
        )))
    }

    /// Both sides changed the same file: delegate to the textual merger.
    fn merge_files(
        &self,
        path: &str,
        base: Option<&Link>,
        origin: &Link,
        dest: &Link,
        conflicts: &mut BTreeMap<PathBuf, ConflictKind>,
    ) -> anyhow::Result<Option<Link>> {
        let origin_bytes = self.file_content(origin)?;
        let dest_bytes = self.file_content(dest)?;
        let base_bytes = match base {
            Some(link) if link.kind == ObjectKind::File => self.file_content(link)?,
            _ => Vec::new(),
        };

        let outcome = text::merge3(&origin_bytes, &base_bytes, &dest_bytes);
        if outcome.conflict {
            conflicts.insert(PathBuf::from(path), ConflictKind::TextConflict);
            return Ok(None);
        }

        let blob = self.store.put_block(&outcome.bytes)?;
        let file = FileNode::new(path.to_string(), blob);
        Ok(Some(Link::new(
            self.store.put_file(&file)?,
            ObjectKind::File,
        )))
    }

    fn file_content(&self, link: &Link) -> anyhow::Result<Vec<u8>> {
        let file = self.store.get_file(&link.cid)?;
        Ok(self.store.download(&file.link, false)?.to_vec())
    }
}
