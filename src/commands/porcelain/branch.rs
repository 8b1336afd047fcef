use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Create a branch pointing at the current head.
    pub async fn branch_create(&mut self, name: &str) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_exclusive()?;

        let name = BranchName::try_parse(name)?;
        let head = self.refs().current_head()?;
        self.refs().create(&name, head.as_ref())?;

        writeln!(self.writer(), "Created branch '{name}'")?;
        Ok(())
    }

    /// List branches, marking the current one.
    pub async fn branch_list(&mut self) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_shared()?;

        let current = self.refs().current()?;
        for name in self.refs().list()? {
            if name == current {
                writeln!(self.writer(), "* {}", name.to_string().green())?;
            } else {
                writeln!(self.writer(), "  {name}")?;
            }
        }
        Ok(())
    }

    /// Delete a branch (never the current one).
    pub async fn branch_delete(&mut self, name: &str) -> anyhow::Result<()> {
        self.require_initialized()?;
        let _lock = self.lock_exclusive()?;

        let name = BranchName::try_parse(name)?;
        self.refs().delete(&name)?;

        writeln!(self.writer(), "Deleted branch '{name}'")?;
        Ok(())
    }
}
