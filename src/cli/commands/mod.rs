//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `rename`: plan and apply tag-based renames
//! - `tags`: dump the tags the namer sees, for collision triage

mod rename;
mod tags;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use rename::cmd_rename;
pub use tags::cmd_tags;

/// Rename and relocate MP3 files based on their tags
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Move MP3s into a genre-first layout derived from their tags
    Rename {
        /// Where to look for MP3s, recursively
        #[arg(short, long, env = "TAG_RENAMER_INPUT_DIR")]
        input_dir: Option<PathBuf>,
        /// Where to write MP3s (may be the same as the input directory)
        #[arg(short, long, env = "TAG_RENAMER_OUTPUT_BASE_DIR")]
        output_base_dir: Option<PathBuf>,
        /// Plan and report only; pass `false` to move files (default: true)
        #[arg(long, value_name = "BOOL", conflicts_with = "apply")]
        dry_run: Option<bool>,
        /// Move files; same as `--dry-run false`
        #[arg(long)]
        apply: bool,
        /// Config file to read defaults from
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the tags of MP3 files as tab-separated rows
    Tags {
        /// Files to inspect; read from stdin, one per line, when omitted
        paths: Vec<PathBuf>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Rename {
            input_dir,
            output_base_dir,
            dry_run,
            apply,
            config,
        } => {
            let dry_run = if apply { Some(false) } else { dry_run };
            cmd_rename(input_dir, output_base_dir, dry_run, config.as_deref())
        }
        Commands::Tags { paths } => cmd_tags(paths),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dry_run_value() {
        let cli = Cli::try_parse_from([
            "tag-renamer",
            "rename",
            "-i",
            "/in",
            "-o",
            "/out",
            "--dry-run",
            "false",
        ])
        .unwrap();

        let Commands::Rename {
            dry_run, apply, ..
        } = cli.command
        else {
            panic!("expected rename");
        };
        assert_eq!(dry_run, Some(false));
        assert!(!apply);
    }

    #[test]
    fn test_apply_conflicts_with_dry_run() {
        let result = Cli::try_parse_from([
            "tag-renamer",
            "rename",
            "--apply",
            "--dry-run",
            "true",
        ]);
        assert!(result.is_err());
    }
}
