//! Content identifiers
//!
//! A CID is the SHA-256 digest of an object's canonical encoding, carried as
//! a 64-character hexadecimal string. CID equality implies byte-identity of
//! the referenced content: two objects with the same CID are the same object.
//!
//! ## Storage
//!
//! Blocks are stored in `.pando/ipfs/<first-2-chars>/<remaining-62-chars>`.

use crate::artifacts::objects::CID_LENGTH;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Content identifier: hex SHA-256 of a canonical object encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    /// Compute the CID of a byte string.
    pub fn for_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Cid(hex::encode(digest))
    }

    /// Parse and validate a CID from its hex form.
    pub fn try_parse(id: impl Into<String>) -> anyhow::Result<Self> {
        let id = id.into();
        if id.len() != CID_LENGTH {
            anyhow::bail!("invalid CID length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("invalid CID characters: {}", id);
        }
        Ok(Cid(id))
    }

    /// Sharded path for block storage: `ab/cdef…` for CID `abcdef…`.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Abbreviated form for display.
    pub fn to_short(&self) -> &str {
        &self.0[..8]
    }
}

impl AsRef<str> for Cid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
