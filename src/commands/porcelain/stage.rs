use crate::areas::repository::Repository;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    /// Stage the given paths for the next snapshot.
    ///
    /// Directories (and `.`) expand to every file below them, plus every
    /// tracked path below them that is gone from disk — so staging a
    /// directory also stages the deletions inside it.
    pub async fn stage(&mut self, paths: &[String]) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_exclusive()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        index.update(self.workspace())?;

        let mut targets = BTreeSet::new();
        for raw in paths {
            let path = PathBuf::from(raw);

            if raw == "." {
                targets.extend(self.workspace().walk()?);
                targets.extend(index.entries().map(|(p, _)| p.clone()));
            } else if self.workspace().path().join(&path).is_dir() {
                targets.extend(
                    self.workspace()
                        .walk()?
                        .into_iter()
                        .filter(|p| p.starts_with(&path)),
                );
                targets.extend(
                    index
                        .entries()
                        .map(|(p, _)| p.clone())
                        .filter(|p| p.starts_with(&path)),
                );
            } else {
                targets.insert(path);
            }
        }

        // the metadata directory is never content
        targets.retain(|path| !path.starts_with(".pando"));

        for path in &targets {
            index.stage(path, self.workspace(), self.store())?;
        }

        index.write_updates()?;

        let pending = index.report().unsnapshot.len();
        writeln!(self.writer(), "{pending} path(s) staged for snapshot")?;
        Ok(())
    }
}
