//! Per-format syntax gates for incoming writes.
//!
//! Checks here are shallow: they stop the obvious mistake (a section
//! header missing its `]`, a key with a bad first character) before it
//! lands on disk. None of them is a full parser for the format it guards,
//! and formats without a checker are written as-is.

pub mod brewfile;
pub mod toml;

pub use brewfile::BrewfilePackages;
pub use toml::{RejectReason, Rejection, Verdict};
