//! User-facing commands
//!
//! - `init`: initialize a new workspace
//! - `status`: show the working tree status
//! - `stage`: record file content for the next snapshot
//! - `snapshot`: create a snapshot from the staged state
//! - `branch`: create, list or delete branches
//! - `checkout`: switch branches, reconciling the working directory
//! - `merge`: three-way merge of another branch into the current one
//! - `log`: walk the snapshot history

pub mod branch;
pub mod checkout;
pub mod init;
pub mod log;
pub mod merge;
pub mod snapshot;
pub mod stage;
pub mod status;
