//! Branch name validation
//!
//! Branch names are non-empty strings with no path separators; they become
//! file names under `.pando/branches/`, so anything that could traverse or
//! hide in that directory is rejected.

use crate::artifacts::core::PandoError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();

        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.ends_with(".lock")
            && !name.contains("..")
            && name.chars().all(|c| {
                !c.is_control() && !matches!(c, '/' | '\\' | ' ' | '~' | '^' | ':' | '?' | '*' | '[')
            });

        if valid {
            Ok(BranchName(name))
        } else {
            Err(PandoError::InvalidBranchName(name).into())
        }
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
