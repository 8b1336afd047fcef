//! Checkout engine
//!
//! Reconciles the working directory from one tree to another by walking
//! both trees in lockstep by child name:
//!
//! - name only in the new tree: materialize the whole subtree (download
//!   blobs, write files)
//! - name only in the base tree: remove the corresponding workspace path
//! - same CID: untouched
//! - same kind, different CID: overwrite the file, or recurse for trees
//! - kind flip: remove the base side, write the new side
//!
//! Atomicity is best-effort per file; there is no transactional rollback.
//! Callers reinitialize the index only after the walk has completed, so an
//! interrupted checkout leaves a detectably dirty workspace.

use crate::artifacts::objects::object::ObjectKind;
use crate::artifacts::objects::tree::{Link, Tree, join_path};
use crate::areas::store::Store;
use crate::areas::workspace::Workspace;
use derive_new::new;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(new)]
pub struct CheckoutEngine<'r> {
    store: &'r Store,
    workspace: &'r Workspace,
}

impl CheckoutEngine<'_> {
    /// Apply the difference between two trees onto the working directory.
    pub fn apply_tree_diff(&self, base: &Tree, new: &Tree) -> anyhow::Result<()> {
        self.diff_children(".", base, new)
    }

    fn diff_children(&self, path: &str, base: &Tree, new: &Tree) -> anyhow::Result<()> {
        let names: BTreeSet<&String> =
            base.children.keys().chain(new.children.keys()).collect();

        for name in names {
            let child_path = join_path(path, name);

            match (base.child(name), new.child(name)) {
                (None, Some(link)) => self.write_subtree(&child_path, link)?,
                (Some(_), None) => self.remove_path(&child_path)?,
                (Some(old), Some(link)) if old.cid == link.cid => {}
                (Some(old), Some(link)) if old.kind == link.kind => match link.kind {
                    ObjectKind::File => self.write_file(&child_path, link)?,
                    _ => {
                        let old_tree = self.store.get_tree(&old.cid)?;
                        let new_tree = self.store.get_tree(&link.cid)?;
                        self.diff_children(&child_path, &old_tree, &new_tree)?;
                    }
                },
                (Some(_), Some(link)) => {
                    // kind flip: clear whatever is there, then materialize
                    self.remove_path(&child_path)?;
                    self.write_subtree(&child_path, link)?;
                }
                (None, None) => unreachable!("name came from one of the trees"),
            }
        }

        Ok(())
    }

    /// Recursively materialize a subtree into the working directory.
    fn write_subtree(&self, path: &str, link: &Link) -> anyhow::Result<()> {
        match link.kind {
            ObjectKind::File => self.write_file(path, link),
            _ => {
                let tree = self.store.get_tree(&link.cid)?;
                for (name, child) in &tree.children {
                    self.write_subtree(&join_path(path, name), child)?;
                }
                Ok(())
            }
        }
    }

    fn write_file(&self, path: &str, link: &Link) -> anyhow::Result<()> {
        let file = self.store.get_file(&link.cid)?;
        let content = self.store.download(&file.link, false)?;
        self.workspace.write(Path::new(path), &content)
    }

    fn remove_path(&self, path: &str) -> anyhow::Result<()> {
        self.workspace.remove(Path::new(path))
    }
}
