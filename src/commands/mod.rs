//! CLI command implementations for jstat-exporter.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: Runtime requirement validation
//! - `test`: One-off scrapes printed to stdout

pub mod check;

// Re-export command functions
pub use check::command_check;
pub use test::command_test;
