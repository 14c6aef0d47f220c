//! Test utilities and fixtures for tag-renamer tests.
//!
//! Real MP3s are awkward to produce in tests, so fixture files store their
//! tags as plain `key=value` lines and [`fixture_reader`] stands in for
//! [`crate::metadata::read`].
//!
//! # Example
//!
//! ```ignore
//! let dir = tempfile::tempdir().unwrap();
//! let song = write_fixture(dir.path(), "in/song.mp3", &ac_dc_tags());
//! let tags = fixture_reader(&song).unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::metadata::TagSet;

/// Marker content that makes [`fixture_reader`] fail.
pub const CORRUPT: &str = "CORRUPT";

/// The tag set of the documented end-to-end example.
pub fn ac_dc_tags() -> TagSet {
    TagSet::from_pairs([
        ("genre", "Rock"),
        ("artist", "AC/DC"),
        ("artistsort", "AC DC"),
        ("album", "Back in Black"),
        ("date", "1980-07-25"),
        ("tracknumber", "1/10"),
        ("title", "Hells Bells"),
    ])
}

/// Same as [`ac_dc_tags`] with a different title and track.
pub fn ac_dc_track(track: &str, title: &str) -> TagSet {
    let mut tags = TagSet::from_pairs([("tracknumber", track), ("title", title)]);
    for (k, v) in ac_dc_tags().iter() {
        tags.insert(k, v);
    }
    tags
}

/// Write a fixture file at `root/relative`, creating parent directories.
pub fn write_fixture(root: &Path, relative: &str, tags: &TagSet) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().expect("fixture has a parent"))
        .expect("Failed to create fixture directory");

    let body: String = tags.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
    std::fs::write(&path, body).expect("Failed to write fixture");
    path
}

/// Write a fixture that [`fixture_reader`] refuses to parse.
pub fn write_corrupt_fixture(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().expect("fixture has a parent"))
        .expect("Failed to create fixture directory");
    std::fs::write(&path, CORRUPT).expect("Failed to write fixture");
    path
}

/// Tag reader for fixture files.
pub fn fixture_reader(path: &Path) -> Result<TagSet> {
    let contents = std::fs::read_to_string(path)?;
    if contents.starts_with(CORRUPT) {
        return Err(Error::metadata(path, "corrupt fixture"));
    }
    Ok(TagSet::from_pairs(
        contents.lines().filter_map(|line| line.split_once('=')),
    ))
}
