//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tag-renamer\config.toml
//! - macOS: ~/Library/Application Support/tag-renamer/config.toml
//! - Linux: ~/.config/tag-renamer/config.toml
//!
//! The file only supplies defaults. Command-line flags always win, and the
//! resolved [`RenameConfig`] is passed explicitly to the organizer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Contents of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for the `rename` command
    pub rename: RenameDefaults,
}

/// Optional defaults for a rename run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameDefaults {
    /// Root scanned recursively for MP3 files
    pub input_dir: Option<PathBuf>,

    /// Root under which new paths are built
    pub output_base_dir: Option<PathBuf>,

    /// Plan and report only, without moving anything
    pub dry_run: bool,
}

impl Default for RenameDefaults {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_base_dir: None,
            dry_run: true,
        }
    }
}

/// Fully resolved settings for one rename run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameConfig {
    pub input_dir: PathBuf,
    pub output_base_dir: PathBuf,
    pub dry_run: bool,
}

impl RenameConfig {
    /// Merge command-line values over the file defaults.
    ///
    /// Both directories are required from one source or the other.
    pub fn resolve(
        defaults: &RenameDefaults,
        input_dir: Option<PathBuf>,
        output_base_dir: Option<PathBuf>,
        dry_run: Option<bool>,
    ) -> Result<Self> {
        let input_dir = input_dir
            .or_else(|| defaults.input_dir.clone())
            .ok_or_else(|| Error::config("input_dir is required"))?;
        let output_base_dir = output_base_dir
            .or_else(|| defaults.output_base_dir.clone())
            .ok_or_else(|| Error::config("output_base_dir is required"))?;

        let config = Self {
            input_dir,
            output_base_dir,
            dry_run: dry_run.unwrap_or(defaults.dry_run),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that both roots are usable before any scanning starts.
    pub fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(Error::config("input_dir must not be empty"));
        }
        if self.output_base_dir.as_os_str().is_empty() {
            return Err(Error::config("output_base_dir must not be empty"));
        }
        if !self.input_dir.is_dir() {
            return Err(Error::config(format!(
                "input_dir {} is not a directory",
                self.input_dir.display()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tag-renamer"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
