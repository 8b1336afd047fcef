use crate::areas::repository::Repository;
use crate::artifacts::core::PandoError;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::objects::tree::TreeBuilder;
use std::io::Write;

impl Repository {
    /// Create a snapshot from the staged index state and advance the
    /// current branch head onto it.
    pub async fn snapshot(&mut self, message: &str) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_exclusive()?;

        let current = self.refs().current()?;
        let head = self.refs().head(&current)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        index.update(self.workspace())?;

        if index.report().unsnapshot.is_empty() {
            return Err(PandoError::NothingToSnapshot.into());
        }

        // every staged path lands in the tree; staged deletions are simply
        // not inserted, which removes them from the snapshot
        let mut builder = TreeBuilder::new();
        for (path, blob) in index.staged_files() {
            builder.insert(path, blob.clone())?;
        }
        let tree = builder.write(self.store())?;

        let snapshot = Snapshot::new(
            self.author()?,
            message.to_string(),
            chrono::Utc::now().timestamp(),
            tree,
            head.into_iter().collect(),
        );
        let cid = self.store().put_snapshot(&snapshot)?;
        self.store().pin(&cid)?;

        self.refs().set_head(&current, &cid)?;
        index.absorb_snapshot();
        index.write_updates()?;

        writeln!(
            self.writer(),
            "[{current} {}] {}",
            cid.to_short(),
            snapshot.short_message()
        )?;

        Ok(())
    }
}
