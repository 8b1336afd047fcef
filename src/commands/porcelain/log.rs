use crate::areas::repository::Repository;
use crate::artifacts::dag::Ancestors;
use crate::artifacts::objects::cid::Cid;
use chrono::TimeZone;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Walk the snapshot history of the current branch, newest first
    /// (breadth-first over parents, deduplicated).
    pub async fn log(&mut self) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_shared()?;

        let current = self.refs().current()?;
        let Some(head) = self.refs().head(&current)? else {
            writeln!(self.writer(), "no snapshots on branch '{current}' yet")?;
            return Ok(());
        };

        self.print_snapshot(&head)?;
        for ancestor in Ancestors::of(self.store(), &head)? {
            self.print_snapshot(&ancestor?)?;
        }

        Ok(())
    }

    fn print_snapshot(&self, cid: &Cid) -> anyhow::Result<()> {
        let snapshot = self.store().get_snapshot(cid)?;
        let mut writer = self.writer();

        writeln!(writer, "{} {}", "snapshot".yellow(), cid.to_string().yellow())?;
        if snapshot.is_merge() {
            let parents = snapshot
                .parents
                .iter()
                .map(|p| p.to_short().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "Merge: {parents}")?;
        }
        writeln!(writer, "Author: {}", snapshot.author)?;
        let date = chrono::Utc
            .timestamp_opt(snapshot.timestamp, 0)
            .single()
            .map(|t| t.to_rfc2822())
            .unwrap_or_else(|| snapshot.timestamp.to_string());
        writeln!(writer, "Date:   {date}")?;
        writeln!(writer)?;
        writeln!(writer, "    {}", snapshot.message)?;
        writeln!(writer)?;

        Ok(())
    }
}
