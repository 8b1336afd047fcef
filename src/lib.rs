//! A content-addressed version control core.
//!
//! `pando` manages a working directory, a staging index, named branches and a
//! DAG of immutable snapshots. Every object (snapshot, tree, file) is stored
//! in a local content-addressable block store and keyed by the CID of its
//! canonical IPLD encoding.
//!
//! The crate is organized into three layers:
//!
//! - `areas`: stateful subsystems (object store, workspace, index, refs,
//!   repository facade)
//! - `artifacts`: data structures and algorithms (objects and their codec,
//!   DAG traversal, checkout and merge engines, status derivation)
//! - `commands`: the user-facing operations, implemented as methods on
//!   [`areas::repository::Repository`]

pub mod areas;
pub mod artifacts;
pub mod commands;
