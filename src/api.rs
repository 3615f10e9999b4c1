//! # Quick Start API
//!
//! High-level, ergonomic API for common use cases. A [`Dump`] starts from the
//! default preferences (a broad list of source extensions and the usual
//! build/cache folders pruned) so most runs only name a folder.
//!
//! ## Examples
//!
//! ```no_run
//! use code_dump::api::{quick_dump, Dump};
//! use code_dump::JsonFileStore;
//!
//! // Dump the current directory into ./CodeDumps
//! Dump::current_dir().run()?;
//!
//! // Only C# files under Assets, timestamps in UTC
//! Dump::dir("Assets")
//!     .extensions(".cs")
//!     .output("Snapshots")
//!     .utc()
//!     .run()?;
//!
//! // Re-run with whatever was saved last time
//! quick_dump(&JsonFileStore::new(".code-dump.json"))?;
//! # Ok::<(), code_dump::Error>(())
//! ```

use crate::{DumpResult, Pipeline, PreferenceStore, Preferences, Result};
use std::path::PathBuf;

/// Fluent builder for a single dump.
#[derive(Debug, Clone, Default)]
#[must_use = "call .run() to execute the dump"]
pub struct Dump {
    prefs: Preferences,
    working_dir: Option<PathBuf>,
    skip_paths: Vec<PathBuf>,
}

impl Dump {
    /// Dumps the current directory.
    pub fn current_dir() -> Self {
        Self::default()
    }

    /// Dumps `path`, relative to the working directory.
    pub fn dir(path: impl Into<String>) -> Self {
        Self::default().source(path)
    }

    /// Starts from previously saved preferences.
    pub fn from_preferences(prefs: Preferences) -> Self {
        Self {
            prefs,
            ..Self::default()
        }
    }

    /// Sets the source folder.
    pub fn source(mut self, path: impl Into<String>) -> Self {
        self.prefs.source_folder = path.into();
        self
    }

    /// Sets the output directory.
    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.prefs.output_directory = path.into();
        self
    }

    /// Sets the title and file name base.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.prefs.base_file_name = name.into();
        self
    }

    /// Replaces the extension list (comma-separated, empty for all files).
    pub fn extensions(mut self, csv: impl Into<String>) -> Self {
        self.prefs.extensions = csv.into();
        self
    }

    /// Replaces the pruned directory list (comma-separated).
    pub fn exclude_dirs(mut self, csv: impl Into<String>) -> Self {
        self.prefs.exclude_dirs = csv.into();
        self
    }

    /// Keeps only files whose name contains `text`.
    pub fn include_name(mut self, text: impl Into<String>) -> Self {
        self.prefs.include_name_contains = text.into();
        self
    }

    /// Drops files whose name contains `text`.
    pub fn exclude_name(mut self, text: impl Into<String>) -> Self {
        self.prefs.exclude_name_contains = text.into();
        self
    }

    /// Stamps the dump in UTC.
    pub fn utc(mut self) -> Self {
        self.prefs.use_utc_time = true;
        self
    }

    /// Stamps the dump in local time.
    pub fn local_time(mut self) -> Self {
        self.prefs.use_utc_time = false;
        self
    }

    /// Omits the counts and header block.
    pub fn no_header(mut self) -> Self {
        self.prefs.write_header = false;
        self
    }

    /// Anchors relative paths at `dir` instead of the process cwd.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Leaves `path` out of the dump, e.g. a preferences file kept in the
    /// source tree.
    pub fn skip(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_paths.push(path.into());
        self
    }

    /// The preferences this dump would run with.
    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Executes the dump.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined, the
    /// source folder is missing, or any file operation fails.
    pub fn run(self) -> Result<DumpResult> {
        let working_dir = match self.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| crate::Error::io(".", e))?,
        };
        let timestamp = self.prefs.timestamp_now();
        let mut config = self.prefs.into_config(working_dir, timestamp)?;
        config.skip_paths.extend(self.skip_paths);
        Pipeline::new(config)?.run()
    }
}

/// Runs a dump with the preferences currently held by `store`.
///
/// # Errors
///
/// Returns an error if loading the preferences or running the dump fails.
pub fn quick_dump(store: &dyn PreferenceStore) -> Result<DumpResult> {
    let prefs = store.load()?;
    let dump = Dump::from_preferences(prefs);
    match store.location() {
        Some(path) => dump.skip(path).run(),
        None => dump.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonFileStore;
    use assert_fs::prelude::*;

    #[test]
    fn dump_builder_has_sensible_defaults() {
        let dump = Dump::current_dir();
        assert_eq!(dump.preferences(), &Preferences::default());
    }

    #[test]
    fn dump_builder_is_fluent() {
        let dump = Dump::dir("Assets")
            .extensions(".cs")
            .exclude_dirs("Temp")
            .include_name("Player")
            .utc()
            .no_header();

        let prefs = dump.preferences();
        assert_eq!(prefs.source_folder, "Assets");
        assert_eq!(prefs.extensions, ".cs");
        assert_eq!(prefs.include_name_contains, "Player");
        assert!(prefs.use_utc_time);
        assert!(!prefs.write_header);
    }

    #[test]
    fn dump_runs_in_working_dir() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Assets/Player.cs").write_str("class Player {}\n").unwrap();
        temp.child("Assets/Player.cs.meta").write_str("guid: 1\n").unwrap();
        temp.child("Assets/Library/Cache.cs").write_str("class Cache {}\n").unwrap();

        let result = Dump::dir("Assets")
            .working_dir(temp.path())
            .run()
            .unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(result.class_count, 1);
        assert!(result.output_path.starts_with(temp.path().join("CodeDumps")));
        assert!(result.output_path.is_file());
    }

    #[test]
    fn repeated_dumps_leave_out_their_own_output() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("Game.cs").write_str("class Game {}\n").unwrap();
        JsonFileStore::in_dir(temp.path())
            .save(&Preferences::default())
            .unwrap();

        let first = Dump::current_dir().working_dir(temp.path()).run().unwrap();
        let first_text = std::fs::read_to_string(&first.output_path).unwrap();
        let second = Dump::current_dir().working_dir(temp.path()).run().unwrap();
        let second_text = std::fs::read_to_string(&second.output_path).unwrap();

        assert_eq!(first.file_count, 1);
        assert_eq!(second.file_count, 1);
        assert_eq!(second_text.matches("## Game.cs").count(), 1);
        assert!(!second_text.contains("CodeDumps/"));
        assert!(!second_text.contains(".code-dump.json"));

        assert_eq!(first_text.lines().count(), second_text.lines().count());
        for (a, b) in first_text.lines().zip(second_text.lines()) {
            if a != b {
                assert!(a.starts_with("Generated: "));
            }
        }
    }

    #[test]
    fn quick_dump_skips_its_preferences_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/Main.java").write_str("class Main {}\n").unwrap();
        let store = JsonFileStore::new(temp.path().join("src/dump-settings.json"));
        store
            .save(&Preferences {
                source_folder: temp.path().join("src").to_string_lossy().into_owned(),
                output_directory: temp.path().join("out").to_string_lossy().into_owned(),
                ..Preferences::default()
            })
            .unwrap();

        let result = quick_dump(&store).unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(result.class_count, 1);
    }

    #[test]
    fn quick_dump_reports_missing_source() {
        let temp = assert_fs::TempDir::new().unwrap();
        let store = JsonFileStore::in_dir(temp.path());
        store
            .save(&Preferences {
                source_folder: temp.path().join("missing").to_string_lossy().into_owned(),
                output_directory: temp.path().join("out").to_string_lossy().into_owned(),
                ..Preferences::default()
            })
            .unwrap();

        let err = quick_dump(&store).unwrap_err();
        assert!(err.is_not_found());
    }
}
