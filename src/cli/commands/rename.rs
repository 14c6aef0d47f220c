//! Tag-based rename command.

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::config::{self, RenameConfig};
use crate::organizer::{self, RunOutcome};

/// Plan, validate and (unless dry-running) apply renames.
///
/// Collisions end the run normally after being reported; only failures
/// during the moves themselves become errors.
pub fn cmd_rename(
    input_dir: Option<PathBuf>,
    output_base_dir: Option<PathBuf>,
    dry_run: Option<bool>,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    let file_config = match config_file {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    let config = RenameConfig::resolve(&file_config.rename, input_dir, output_base_dir, dry_run)
        .context("Invalid rename configuration")?;

    tracing::info!(
        "Renaming MP3s from {} into {}{}",
        config.input_dir.display(),
        config.output_base_dir.display(),
        if config.dry_run { " [DRY RUN]" } else { "" }
    );

    let stdout = std::io::stdout();
    let outcome = organizer::run(&config, &mut stdout.lock())
        .context("Rename run aborted")?;

    match outcome {
        RunOutcome::Completed(summary) if summary.dry_run => {
            tracing::info!(
                "Dry run complete: {} file(s) would move, {} already in place",
                summary.planned,
                summary.unchanged
            );
        }
        RunOutcome::Completed(summary) => {
            tracing::info!(
                "Done: moved {} of {} file(s), {} already in place",
                summary.moved,
                summary.planned,
                summary.unchanged
            );
        }
        RunOutcome::PreexistingCollisions(paths) => {
            tracing::warn!("Stopped on {} pre-existing collision(s)", paths.len());
        }
        RunOutcome::NewCollisions(groups) => {
            tracing::warn!(
                "Stopped on {} new collision(s); colliding sources listed on stdout",
                groups.len()
            );
        }
    }
    Ok(())
}
