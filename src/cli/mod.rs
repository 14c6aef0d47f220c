//! Command-line interface for tag-renamer.
//!
//! Stdout carries only machine-consumable lines (`mv` commands, collision
//! listings, tag rows); everything else goes through `tracing` to stderr.

mod commands;

pub use commands::{Cli, Commands, run_command};
