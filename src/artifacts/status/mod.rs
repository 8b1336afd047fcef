//! Working tree status
//!
//! Derives the four status sets from the index and renders them in a
//! porcelain-style two-column listing: one line per path, a status tag in
//! the first column, sorted by path.

use colored::Colorize;
use std::path::PathBuf;

/// Snapshot of the derived index sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// Staged content awaiting a snapshot (includes staged deletions).
    pub unsnapshot: Vec<PathBuf>,
    /// Tracked paths whose disk content differs from the staged content.
    pub modified: Vec<PathBuf>,
    /// Snapshotted paths missing from disk.
    pub deleted: Vec<PathBuf>,
    /// Paths never staged nor snapshotted.
    pub untracked: Vec<PathBuf>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.unsnapshot.is_empty()
            && self.modified.is_empty()
            && self.deleted.is_empty()
            && self.untracked.is_empty()
    }

    /// Render the report; paths occurring in several sets keep one line per
    /// set, sorted by path with tag order S / M / D / ? breaking ties.
    pub fn render(&self) -> String {
        let mut rows: Vec<(&PathBuf, u8, String)> = Vec::new();

        for path in &self.unsnapshot {
            rows.push((path, 0, "S".green().to_string()));
        }
        for path in &self.modified {
            if self.deleted.contains(path) {
                continue;
            }
            rows.push((path, 1, "M".yellow().to_string()));
        }
        for path in &self.deleted {
            rows.push((path, 2, "D".red().to_string()));
        }
        for path in &self.untracked {
            rows.push((path, 3, "?".bright_black().to_string()));
        }

        rows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        rows.iter()
            .map(|(path, _, tag)| format!("{} {}", tag, path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
