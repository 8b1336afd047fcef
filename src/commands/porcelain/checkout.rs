use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::CheckoutEngine;
use crate::artifacts::core::PandoError;
use std::io::Write;

impl Repository {
    /// Switch to another branch, reconciling the working directory from
    /// the current head's tree to the target head's tree.
    ///
    /// Fails fast on a dirty workspace: nothing is touched while modified
    /// or staged-but-unsnapshotted paths exist.
    pub async fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_exclusive()?;

        let target = BranchName::try_parse(target)?;
        if !self.refs().exists(&target) {
            return Err(PandoError::UnknownBranch(target.to_string()).into());
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

        if target == current {
            writeln!(self.writer(), "Already on '{target}'")?;
            return Ok(());
        }

        let base_tree = self.root_tree(self.refs().head(&current)?.as_ref())?;
        let new_tree = self.root_tree(self.refs().head(&target)?.as_ref())?;

        CheckoutEngine::new(self.store(), self.workspace())
            .apply_tree_diff(&base_tree, &new_tree)?;

        // only now does the index learn the new baseline; an interruption
        // above leaves a detectably dirty workspace instead
        index.reinitialize(&new_tree, self.store())?;
        index.write_updates()?;
        self.refs().set_current(&target)?;

        writeln!(self.writer(), "Switched to branch '{target}'")?;
        Ok(())
    }
}
