use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Show the working tree status: current branch plus the derived
    /// staged / modified / deleted / untracked sets.
    ///
    /// Read-only: the rescanned index is not persisted.
    pub async fn status(&mut self) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_shared()?;

        let current = self.refs().current()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        let report = index.update(self.workspace())?;

        let mut writer = self.writer();
        writeln!(writer, "On branch {current}")?;
        if report.is_clean() {
            writeln!(writer, "nothing to snapshot, workspace clean")?;
        } else {
            writeln!(writer, "{}", report.render())?;
        }

        Ok(())
    }
}
