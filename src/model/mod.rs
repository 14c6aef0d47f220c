//! Core data models for a rename run.
//!
//! One [`FileRecord`] exists per discovered file. Records are built once by
//! the namer and only their [`CollisionState`] is filled in later, during
//! planning. The whole collection is dropped at the end of the run.

use std::path::{Path, PathBuf};

use crate::metadata::TagSet;

/// Whether a record's target is already occupied on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionState {
    #[default]
    None,
    /// Target exists and is a different file than the source
    Preexisting,
}

/// A scanned file together with its computed destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    original_path: PathBuf,
    new_path: PathBuf,
    changed: bool,
    collision: CollisionState,
    /// Raw tags, kept for diagnostics only
    tags: TagSet,
}

impl FileRecord {
    pub fn new(original_path: PathBuf, new_path: PathBuf, tags: TagSet) -> Self {
        let changed = new_path != original_path;
        Self {
            original_path,
            new_path,
            changed,
            collision: CollisionState::None,
            tags,
        }
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn new_path(&self) -> &Path {
        &self.new_path
    }

    /// True when the file actually needs to move.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn collision(&self) -> CollisionState {
        self.collision
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Recompute the collision state against the filesystem.
    pub(crate) fn check_preexisting(&mut self) {
        self.collision = if self.changed && self.new_path.exists() {
            CollisionState::Preexisting
        } else {
            CollisionState::None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_changed_tracks_path_equality() {
        let same = FileRecord::new("/a/b.mp3".into(), "/a/b.mp3".into(), TagSet::new());
        let moved = FileRecord::new("/a/b.mp3".into(), "/c/d.mp3".into(), TagSet::new());
        assert!(!same.changed());
        assert!(moved.changed());
        assert_eq!(moved.collision(), CollisionState::None);
    }

    #[test]
    fn test_preexisting_only_when_target_differs() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("existing.mp3");
        std::fs::write(&existing, b"x").unwrap();

        let mut in_place = FileRecord::new(existing.clone(), existing.clone(), TagSet::new());
        in_place.check_preexisting();
        assert_eq!(in_place.collision(), CollisionState::None);

        let mut clobber =
            FileRecord::new(dir.path().join("other.mp3"), existing, TagSet::new());
        clobber.check_preexisting();
        assert_eq!(clobber.collision(), CollisionState::Preexisting);
    }
}
