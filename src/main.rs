//! tag-renamer - rename and relocate MP3 files based on their tags.
//!
//! Files are planned into a genre-first layout, the whole batch is checked
//! for collisions, and only then are files moved (or, in a dry run, only
//! reported).

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod organizer;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("tag_renamer=info".parse()?))
        .init();

    cli::run_command(args)
}
