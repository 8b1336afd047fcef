use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::CheckoutEngine;
use crate::artifacts::core::PandoError;
use crate::artifacts::dag::{LcaFinder, slim};
use crate::artifacts::merge::{MergeEngine, MergeOutcome};
use crate::artifacts::objects::cid::Cid;
use crate::artifacts::objects::snapshot::Snapshot;
use std::io::Write;

impl Repository {
    /// Merge `other` into the current branch.
    ///
    /// Fast-forward cases move the head without creating a snapshot. A real
    /// three-way merge reconciles both trees against the lowest common
    /// ancestor and, when clean, snapshots the result with both heads as
    /// parents — the current branch keeps its identity, only its head
    /// moves. On conflict nothing is mutated and the conflict set is
    /// reported.
    pub async fn merge(&mut self, other: &str) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_exclusive()?;

        let other = BranchName::try_parse(other)?;
        if !self.refs().exists(&other) {
            return Err(PandoError::UnknownBranch(other.to_string()).into());
        }
        let current = self.refs().current()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        let report = index.update(self.workspace())?;
        if !report.modified.is_empty() || !report.unsnapshot.is_empty() {
            return Err(PandoError::DirtyWorkspace {
                modified: report.modified,
                unsnapshot: report.unsnapshot,
            }
            .into());
        }

        let origin_head = self.refs().head(&current)?;
        let dest_head = self.refs().head(&other)?;

        let Some(dest_head) = dest_head else {
            writeln!(self.writer(), "Already up to date")?;
            return Ok(());
        };
        if origin_head.as_ref() == Some(&dest_head) {
            writeln!(self.writer(), "Already up to date")?;
            return Ok(());
        }

        let lca = match &origin_head {
            None => None,
            Some(origin) => {
                LcaFinder::new(|cid: &Cid| slim(self.store(), cid)).find(origin, &dest_head)?
            }
        };

        // an empty current branch, or one strictly behind, fast-forwards
        if origin_head.is_none() || lca.as_ref() == origin_head.as_ref() {
            return self.fast_forward(&mut index, &current, origin_head.as_ref(), &dest_head);
        }
        if lca.as_ref() == Some(&dest_head) {
            writeln!(self.writer(), "Already up to date")?;
            return Ok(());
        }

        let origin_head = origin_head.expect("non-ff merge implies a current head");

        let origin_tree = self.root_tree(Some(&origin_head))?;
        let dest_tree = self.root_tree(Some(&dest_head))?;
        // a missing common ancestor merges against the empty tree
        let base_tree = self.root_tree(lca.as_ref())?;

        let outcome =
            MergeEngine::new(self.store()).merge_trees(&origin_tree, &dest_tree, &base_tree)?;

        let merged_tree_cid = match outcome {
            MergeOutcome::Conflicted { paths } => {
                {
                    let mut writer = self.writer();
                    for (path, kind) in &paths {
                        writeln!(writer, "CONFLICT ({kind}): {}", path.display())?;
                    }
                    writeln!(writer, "Automatic merge failed; nothing was changed.")?;
                }
                return Err(PandoError::MergeConflict { paths }.into());
            }
            MergeOutcome::Clean { tree } => tree,
        };

        let merged_tree = self.store().get_tree(&merged_tree_cid)?;
        CheckoutEngine::new(self.store(), self.workspace())
            .apply_tree_diff(&origin_tree, &merged_tree)?;
        index.reinitialize(&merged_tree, self.store())?;
        index.write_updates()?;

        let message = format!("Merged {other} into {current}");
        let snapshot = Snapshot::new(
            self.author()?,
            message.clone(),
            chrono::Utc::now().timestamp(),
            merged_tree_cid,
            vec![origin_head, dest_head],
        );
        let cid = self.store().put_snapshot(&snapshot)?;
        self.store().pin(&cid)?;
        self.refs().set_head(&current, &cid)?;

        writeln!(self.writer(), "[{current} {}] {message}", cid.to_short())?;
        Ok(())
    }

    /// The other branch already contains the current head: move the head
    /// forward and reconcile the workspace, no new snapshot.
    fn fast_forward(
        &self,
        index: &mut Index,
        current: &BranchName,
        origin_head: Option<&Cid>,
        dest_head: &Cid,
    ) -> anyhow::Result<()> {
        let base_tree = self.root_tree(origin_head)?;
        let new_tree = self.root_tree(Some(dest_head))?;

        CheckoutEngine::new(self.store(), self.workspace())
            .apply_tree_diff(&base_tree, &new_tree)?;
        index.reinitialize(&new_tree, self.store())?;
        index.write_updates()?;
        self.refs().set_head(current, dest_head)?;

        writeln!(
            self.writer(),
            "Fast-forward to {}",
            dest_head.to_short()
        )?;
        Ok(())
    }
}
