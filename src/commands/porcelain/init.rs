use crate::areas::repository::{Config, DEFAULT_BRANCH, Repository};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::PandoError;
use std::io::Write;

impl Repository {
    /// Initialize the workspace: metadata directory, object store, config,
    /// an empty index, and an empty default branch.
    pub async fn init(&mut self, author: Option<String>) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(PandoError::AlreadyInitialized(self.path().to_path_buf()).into());
        }

        let metadata = self.metadata_path();
        std::fs::create_dir_all(metadata.join("ipfs"))?;
        std::fs::create_dir_all(metadata.join("branches"))?;
        std::fs::File::create(metadata.join("index"))?;

        let author = author
            .or_else(|| std::env::var("PANDO_AUTHOR").ok().filter(|a| !a.is_empty()))
            .or_else(|| std::env::var("USER").ok().filter(|a| !a.is_empty()))
            .unwrap_or_else(|| "anonymous".to_string());
        self.write_config(&Config { author })?;

        let master = BranchName::try_parse(DEFAULT_BRANCH)?;
        self.refs().create(&master, None)?;
        self.refs().set_current(&master)?;

        writeln!(
            self.writer(),
            "Initialized empty pando workspace in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
