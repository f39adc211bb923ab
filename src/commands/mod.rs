//! CLI subcommand handlers.
//!
//! Keeps `main.rs` down to argument parsing and dispatch.

pub mod completions;
pub mod convert;
