//! Persisted user preferences.
//!
//! Preferences hold the raw, user-facing settings of a dump (comma-separated
//! filter text, relative folders) and turn into a [`DumpConfig`] for a
//! single run. Where they are stored is up to a [`PreferenceStore`].

use crate::config::{
    DEFAULT_EXCLUDE_DIRS, DEFAULT_EXTENSIONS, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR,
    DEFAULT_TITLE, DumpConfig, Timestamp, file_name_for,
};
use crate::error::{Error, Result};
use crate::paths::ensure_parent;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default preferences file name, looked up in the working directory.
pub const DEFAULT_PREFERENCES_FILE: &str = ".code-dump.json";

/// User-facing dump settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Folder to dump
    pub source_folder: String,
    /// Folder receiving timestamped dumps
    pub output_directory: String,
    /// Title and file name base
    pub base_file_name: String,
    /// Comma-separated extensions
    pub extensions: String,
    /// Comma-separated directory names to prune
    pub exclude_dirs: String,
    /// Keep only files whose name contains this text
    pub include_name_contains: String,
    /// Drop files whose name contains this text
    pub exclude_name_contains: String,
    /// Render timestamps in UTC
    pub use_utc_time: bool,
    /// Write counts and header block
    pub write_header: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            source_folder: DEFAULT_SOURCE_DIR.to_string(),
            output_directory: DEFAULT_OUTPUT_DIR.to_string(),
            base_file_name: DEFAULT_TITLE.to_string(),
            extensions: DEFAULT_EXTENSIONS.to_string(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.to_string(),
            include_name_contains: String::new(),
            exclude_name_contains: String::new(),
            use_utc_time: false,
            write_header: true,
        }
    }
}

impl Preferences {
    /// Name of the file a dump taken at `timestamp` would be written to.
    #[must_use]
    pub fn preview_file_name(&self, timestamp: &Timestamp) -> String {
        file_name_for(&self.base_file_name, timestamp)
    }

    /// Captures "now" in the configured timestamp mode.
    #[must_use]
    pub fn timestamp_now(&self) -> Timestamp {
        Timestamp::now(self.use_utc_time)
    }

    /// Builds the configuration for one run.
    ///
    /// The default preferences file in the working directory is never
    /// dumped.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn into_config(
        self,
        working_dir: impl Into<PathBuf>,
        timestamp: Timestamp,
    ) -> Result<DumpConfig> {
        DumpConfig::builder()
            .working_dir(working_dir)
            .source_dir(self.source_folder)
            .output_dir(self.output_directory)
            .title(self.base_file_name)
            .extensions(self.extensions)
            .exclude_dirs(self.exclude_dirs)
            .include_name_contains(self.include_name_contains)
            .exclude_name_contains(self.exclude_name_contains)
            .write_header(self.write_header)
            .skip_path(DEFAULT_PREFERENCES_FILE)
            .use_utc(timestamp.is_utc())
            .captured_at(timestamp.instant())
            .build()
    }
}

/// Loads and saves [`Preferences`].
pub trait PreferenceStore {
    /// Loads stored preferences, or defaults when nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if stored preferences exist but cannot be read.
    fn load(&self) -> Result<Preferences>;

    /// Persists `prefs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be written.
    fn save(&self, prefs: &Preferences) -> Result<()>;

    /// File backing this store, if any. Dumps never include it.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Stores preferences as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`DEFAULT_PREFERENCES_FILE`] inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_PREFERENCES_FILE))
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Result<Preferences> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No preferences at {}, using defaults", self.path.display());
                return Ok(Preferences::default());
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        let prefs = serde_json::from_str(&text)?;
        debug!("Loaded preferences from {}", self.path.display());
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        ensure_parent(&self.path)?;
        let json = serde_json::to_string_pretty(prefs)?;
        fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))?;
        info!("Saved preferences to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
