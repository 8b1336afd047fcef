pub mod cid;
pub mod file;
pub mod node;
pub mod object;
pub mod snapshot;
pub mod tree;

/// Length of a CID in hex characters (SHA-256).
pub const CID_LENGTH: usize = 64;
