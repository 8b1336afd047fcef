//! Data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `branch`: branch name validation
//! - `checkout`: workspace reconciliation between two trees
//! - `core`: the shared error type
//! - `dag`: snapshot ancestry traversal and LCA discovery
//! - `index`: index entry types and path classification
//! - `merge`: three-way tree merge and the textual merge adapter
//! - `objects`: CIDs, the IPLD node codec and the object types
//! - `status`: working tree status derivation

pub mod branch;
pub mod checkout;
pub mod core;
pub mod dag;
pub mod index;
pub mod merge;
pub mod objects;
pub mod status;
