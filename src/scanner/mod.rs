use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extension matched case-insensitively at the end of file names.
const AUDIO_EXTENSION: &str = "mp3";

/// Scans the given root directory recursively for MP3 files.
///
/// Entries are visited in file-name order so repeated runs list files
/// identically. Unreadable entries are logged and skipped.
pub fn scan(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::config(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    tracing::info!("Found {} files under {}", paths.len(), root.display());
    Ok(paths)
}

/// Check whether a file name ends in the audio extension.
///
/// Compares raw bytes so names that are not valid UTF-8 still match.
pub fn is_audio_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| {
            n.as_encoded_bytes()
                .to_ascii_lowercase()
                .ends_with(AUDIO_EXTENSION.as_bytes())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_scan_audio_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("song.mp3")).unwrap();
        File::create(root.join("music.flac")).unwrap(); // Should be ignored
        File::create(root.join("notes.txt")).unwrap(); // Should be ignored
        File::create(root.join("UPPERCASE.MP3")).unwrap(); // Case-insensitive

        let subdir = root.join("subdir");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("track.Mp3")).unwrap();
        std::fs::create_dir(subdir.join("folder.mp3")).unwrap(); // Directories never match

        let paths = scan(root).unwrap();

        let file_names: Vec<String> = paths
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(|s| s.to_string()))
            .collect();

        assert_eq!(file_names, vec!["UPPERCASE.MP3", "song.mp3", "track.Mp3"]);
        assert!(paths.iter().all(|p| p.starts_with(root)));
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let dir = tempdir().unwrap();
        assert!(scan(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("/a/b.mp3")));
        assert!(is_audio_file(Path::new("/a/B.MP3")));
        assert!(!is_audio_file(Path::new("/a/b.mp4")));
        assert!(!is_audio_file(Path::new("/a/mp3/b.ogg")));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_finds_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let latin1 = dir.path().join(OsStr::from_bytes(b"caf\xe9.mp3"));
        File::create(&latin1).unwrap();

        let paths = scan(dir.path()).unwrap();
        assert_eq!(paths, vec![latin1]);
    }
}
