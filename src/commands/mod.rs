//! Command implementations
//!
//! Organized into two categories:
//!
//! - `porcelain`: the user-facing workflow (init, status, stage, snapshot,
//!   branch, checkout, merge, log)
//! - `plumbing`: low-level object inspection (cat)
//!
//! Each command is an `impl Repository` block in its own file.

pub mod plumbing;
pub mod porcelain;
