//! Tag dump command, for triaging collision listings.
//!
//! Pipe the output of a colliding `rename` run straight in:
//! `tag-renamer rename ... | tag-renamer tags`

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::metadata::{self, TagSet};
use crate::naming;

/// Print `path<TAB>target<TAB>key=value...` for each file.
pub fn cmd_tags(paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let paths = if paths.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .map(|line| line.map(PathBuf::from))
            .filter(|p| !matches!(p, Ok(p) if p.as_os_str().is_empty()))
            .collect::<std::io::Result<Vec<_>>>()?
    } else {
        paths
    };

    let stdout = std::io::stdout();
    let failures = write_tag_rows(&paths, metadata::read, &mut stdout.lock())?;
    if failures > 0 {
        tracing::warn!("{} file(s) could not be read", failures);
    }
    Ok(())
}

/// Write one row per readable file and return how many failed.
///
/// The target column is relative to the output root, so it reads the same
/// whatever directory the rename used.
fn write_tag_rows<F, W>(paths: &[PathBuf], read: F, out: &mut W) -> Result<usize>
where
    F: Fn(&Path) -> Result<TagSet>,
    W: Write,
{
    let mut failures = 0;
    for path in paths {
        match read(path) {
            Ok(tags) => {
                let target = naming::TrackFields::resolve(&tags).relative_path();
                write!(out, "{}\t{}", path.display(), target.display())?;
                for (key, value) in tags.iter() {
                    write!(out, "\t{key}={value}")?;
                }
                writeln!(out)?;
            }
            Err(e) => {
                tracing::error!("{}", e);
                failures += 1;
            }
        }
    }
    out.flush()?;
    Ok(failures)
}
