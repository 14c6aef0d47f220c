//! Audio file tag lookup.
//!
//! The naming code only ever asks "what is the first value of this tag?",
//! so tags are exposed through the small [`TagSource`] capability. A real
//! MP3 is read with the lofty crate into a [`TagSet`]; tests build a
//! [`TagSet`] directly.
//!
//! Tag names follow the "easy" ID3 vocabulary: `genre`, `artist`,
//! `artistsort`, `albumartist`, `album`, `date`, `year`, `tracknumber`,
//! `title`.

use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Read-only lookup of the first value of a named tag.
pub trait TagSource {
    fn get(&self, field: &str) -> Option<&str>;
}

/// Tags of a single file, keyed by easy tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    fields: BTreeMap<String, String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tag set from `(name, value)` pairs. Later duplicates are ignored
    /// so the first value wins, matching multi-valued tag semantics.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, value) in pairs {
            set.fields.entry(key.into()).or_insert_with(|| value.into());
        }
        set
    }

    /// Set a tag value unless one is already present.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TagSource for TagSet {
    fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// Compact `key=value` dump, used in diagnostics.
impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value:?}")?;
            first = false;
        }
        Ok(())
    }
}

/// Read the tags of an audio file.
///
/// Uses the primary tag, falling back to the first available tag. A file
/// without any tag is an error.
pub fn read(path: &Path) -> Result<TagSet> {
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("failed to open file for probing: {e}")))?
        .read()
        .map_err(|e| Error::metadata(path, format!("failed to read file metadata: {e}")))?;

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .ok_or_else(|| Error::metadata(path, "no tags found"))?;

    Ok(tag_set_from(tag))
}

fn tag_set_from(tag: &Tag) -> TagSet {
    let mut set = TagSet::new();

    let mut put = |field: &str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            set.insert(field, value);
        }
    };

    put("genre", tag.genre().map(|s| s.to_string()));
    put("artist", tag.artist().map(|s| s.to_string()));
    put(
        "artistsort",
        tag.get_string(&ItemKey::TrackArtistSortOrder).map(str::to_owned),
    );
    put(
        "albumartist",
        tag.get_string(&ItemKey::AlbumArtist).map(str::to_owned),
    );
    put("album", tag.album().map(|s| s.to_string()));
    put(
        "date",
        tag.get_string(&ItemKey::RecordingDate).map(str::to_owned),
    );
    put("year", tag.year().map(|y| y.to_string()));
    // lofty splits "N/M" into two items; rebuild the raw form
    put(
        "tracknumber",
        tag.track().map(|n| match tag.track_total() {
            Some(total) => format!("{n}/{total}"),
            None => n.to_string(),
        }),
    );
    put("title", tag.title().map(|s| s.to_string()));

    set
}
