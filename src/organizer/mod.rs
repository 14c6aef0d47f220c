//! Rename planning and execution.
//!
//! A run happens in strict phases: scan, name every file, validate the whole
//! batch, then move. Nothing on disk changes until every record has been
//! checked against both collision classes:
//!
//! - **pre-existing**: the target is already occupied by an unrelated file
//! - **same-run**: two or more sources map to one target
//!
//! Either class stops the run with zero filesystem changes. Otherwise each
//! changed file is moved with a single `rename`, never copy + delete.
//!
//! # Example
//!
//! ```ignore
//! let config = RenameConfig { input_dir, output_base_dir, dry_run: true };
//! match run(&config, &mut std::io::stdout().lock())? {
//!     RunOutcome::Completed(summary) => println!("{} planned", summary.planned),
//!     _ => {} // collisions were already reported
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::RenameConfig;
use crate::error::{Error, Result};
use crate::metadata::{self, TagSet};
use crate::model::{CollisionState, FileRecord};
use crate::{naming, scanner};

/// Validated set of moves, in target-path order.
#[derive(Debug, Clone)]
pub struct Plan {
    moves: Vec<FileRecord>,
    unchanged: usize,
}

impl Plan {
    /// Records that need to move.
    pub fn moves(&self) -> &[FileRecord] {
        &self.moves
    }

    /// Records already at their target.
    pub fn unchanged(&self) -> usize {
        self.unchanged
    }
}

/// Sources that all map to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGroup {
    pub new_path: PathBuf,
    pub original_paths: Vec<PathBuf>,
}

/// Result of validating a batch.
#[derive(Debug, Clone)]
pub enum PlanOutcome {
    Ready(Plan),
    /// Targets already occupied on disk
    PreexistingCollisions(Vec<PathBuf>),
    /// Targets claimed by more than one source
    NewCollisions(Vec<CollisionGroup>),
}

/// Validate a complete record collection.
///
/// Records are ordered by target path (ties by source path) so every report
/// is deterministic.
pub fn build_plan(mut records: Vec<FileRecord>) -> PlanOutcome {
    records.sort_by(|a, b| {
        a.new_path()
            .cmp(b.new_path())
            .then_with(|| a.original_path().cmp(b.original_path()))
    });

    for record in &mut records {
        record.check_preexisting();
    }

    let preexisting: Vec<PathBuf> = records
        .iter()
        .filter(|r| r.collision() == CollisionState::Preexisting)
        .map(|r| r.new_path().to_path_buf())
        .collect();
    if !preexisting.is_empty() {
        tracing::error!(
            "Pre-existing collisions, stopping: {} target(s) already exist",
            preexisting.len()
        );
        for path in &preexisting {
            tracing::error!("  {}", path.display());
        }
        return PlanOutcome::PreexistingCollisions(preexisting);
    }

    let mut by_target: BTreeMap<&Path, Vec<&Path>> = BTreeMap::new();
    for record in &records {
        by_target
            .entry(record.new_path())
            .or_default()
            .push(record.original_path());
    }
    let collisions: Vec<CollisionGroup> = by_target
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(target, sources)| CollisionGroup {
            new_path: target.to_path_buf(),
            original_paths: sources.into_iter().map(Path::to_path_buf).collect(),
        })
        .collect();
    if !collisions.is_empty() {
        tracing::error!(
            "Would-be new collisions, stopping: {} target(s) claimed more than once",
            collisions.len()
        );
        return PlanOutcome::NewCollisions(collisions);
    }

    let total = records.len();
    let moves: Vec<FileRecord> = records.into_iter().filter(FileRecord::changed).collect();
    let unchanged = total - moves.len();
    tracing::info!(
        "Plan ready: {} to move, {} already in place",
        moves.len(),
        unchanged
    );

    PlanOutcome::Ready(Plan { moves, unchanged })
}

/// Write every colliding source path, one per line.
///
/// The listing is a single-column tab-separated table meant to be piped into
/// a tag inspector for manual triage. Paths containing a tab, newline or
/// double quote are quoted CSV-style (inner quotes doubled) so each path
/// stays one row.
pub fn report_collisions<W: Write>(groups: &[CollisionGroup], out: &mut W) -> std::io::Result<()> {
    for group in groups {
        for source in &group.original_paths {
            writeln!(out, "{}", listing_field(source))?;
        }
    }
    out.flush()
}

fn listing_field(path: &Path) -> String {
    let raw = path.display().to_string();
    if raw.contains(['\t', '\n', '\r', '"']) {
        tracing::warn!("Quoting collision listing row for {:?}", path);
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw
    }
}

/// Counts from an executed plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub planned: usize,
    pub moved: usize,
    /// Files already at their target, never touched
    pub unchanged: usize,
    pub dry_run: bool,
}

/// Perform (or, in a dry run, only report) every move of a plan.
///
/// Each move is written to `out` as a shell-formatted `mv` line, identical in
/// both modes. The first failure aborts the remaining moves; moves already
/// done stay done.
pub fn execute<W: Write>(plan: &Plan, dry_run: bool, out: &mut W) -> Result<ExecutionSummary> {
    let mut moved = 0;

    for record in plan.moves() {
        let source = record.original_path();
        let target = record.new_path();

        for path in [source, target] {
            if path.to_string_lossy().contains('"') {
                return Err(Error::UnsafePath(path.to_path_buf()));
            }
        }

        let line = format!("mv \"{}\" \"{}\"", source.display(), target.display());
        tracing::info!(dry_run, "{}", line);
        writeln!(out, "{line}")?;

        // The plan was validated earlier; something else may have written since
        if target.exists() {
            return Err(Error::TargetExists(target.to_path_buf()));
        }

        if !dry_run {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(source, target)?;
            moved += 1;
        }
    }
    out.flush()?;

    Ok(ExecutionSummary {
        planned: plan.moves().len(),
        moved,
        unchanged: plan.unchanged(),
        dry_run,
    })
}

/// How a run ended. Collisions are normal outcomes with nothing changed.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(ExecutionSummary),
    PreexistingCollisions(Vec<PathBuf>),
    NewCollisions(Vec<CollisionGroup>),
}

/// Run the whole pipeline against real MP3 files.
pub fn run<W: Write>(config: &RenameConfig, out: &mut W) -> Result<RunOutcome> {
    run_with(config, metadata::read, out)
}

/// Run the whole pipeline with a custom tag reader.
pub fn run_with<F, W>(config: &RenameConfig, read: F, out: &mut W) -> Result<RunOutcome>
where
    F: Fn(&Path) -> Result<TagSet>,
    W: Write,
{
    let input_dir = std::path::absolute(&config.input_dir)?;
    let output_base_dir = std::path::absolute(&config.output_base_dir)?;

    let paths = scanner::scan(&input_dir)?;
    let records: Vec<FileRecord> = paths
        .iter()
        .filter_map(|path| naming::extract_file(path, &output_base_dir, &read))
        .collect();

    let skipped = paths.len() - records.len();
    if skipped > 0 {
        tracing::warn!("Skipped {} file(s) with unreadable tags", skipped);
    }

    match build_plan(records) {
        PlanOutcome::PreexistingCollisions(paths) => Ok(RunOutcome::PreexistingCollisions(paths)),
        PlanOutcome::NewCollisions(groups) => {
            report_collisions(&groups, out)?;
            Ok(RunOutcome::NewCollisions(groups))
        }
        PlanOutcome::Ready(plan) => {
            let summary = execute(&plan, config.dry_run, out)?;
            Ok(RunOutcome::Completed(summary))
        }
    }
}
