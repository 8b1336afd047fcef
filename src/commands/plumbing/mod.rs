//! Low-level object inspection commands

pub mod cat;
