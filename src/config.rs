use crate::error::{Error, Result};
use crate::filter::{FilterSet, NameFilter};
use crate::paths::{resolve_output_dir, resolve_path};
use chrono::{DateTime, FixedOffset, Local, Utc};
use std::path::{Path, PathBuf};

/// Default source folder, relative to the working directory.
pub const DEFAULT_SOURCE_DIR: &str = ".";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "CodeDumps";

/// Default base file name and document title.
pub const DEFAULT_TITLE: &str = "CodeDump";

/// Default extension list used by preferences and the high-level API.
pub const DEFAULT_EXTENSIONS: &str = ".cs,.shader,.hlsl,.cginc,.compute,.jslib,.json,.uxml,.uss,.glsl,.py,.js,.ts,.java,.kt,.swift,.cpp,.h,.m,.mm,.rb,.php,.sql,.yml,.yaml,.toml,.ini,.gradle,.xml,.ps1,.sh,.bat,.md";

/// Default excluded directory names used by preferences and the high-level API.
pub const DEFAULT_EXCLUDE_DIRS: &str = "Library,Temp,Obj,Logs,.git,.idea,.vs,Build,Builds,Demos,Demo,Samples,Sample,Examples,Example,UserSettings,MemoryCaptures,Records,Recordings";

const DUMP_EXTENSION: &str = "md";

/// Capture time of a dump together with its rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    at: DateTime<FixedOffset>,
    utc: bool,
}

impl Timestamp {
    /// Captures the current time, in UTC or in the local zone.
    #[must_use]
    pub fn now(utc: bool) -> Self {
        let at: DateTime<FixedOffset> = if utc {
            Utc::now().into()
        } else {
            Local::now().into()
        };
        Self { at, utc }
    }

    /// Wraps an explicit instant. In UTC mode the offset is normalized to zero.
    #[must_use]
    pub fn new(at: DateTime<FixedOffset>, utc: bool) -> Self {
        let at = if utc { at.with_timezone(&Utc).into() } else { at };
        Self { at, utc }
    }

    /// Returns true if the timestamp renders in UTC.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        self.utc
    }

    /// The captured instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<FixedOffset> {
        self.at
    }

    /// Stamp for the `Generated:` header line.
    ///
    /// UTC renders as `2024-05-01T12:30:00Z`, local time as
    /// `2024-05-01 15:30:00 +03:00`.
    #[must_use]
    pub fn header_stamp(&self) -> String {
        if self.utc {
            self.at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
        } else {
            self.at.format("%Y-%m-%d %H:%M:%S %:z").to_string()
        }
    }

    /// Stamp embedded in generated file names, e.g. `2024-05-01_12-30-00Z`.
    #[must_use]
    pub fn file_stamp(&self) -> String {
        let stamp = self.at.format("%Y-%m-%d_%H-%M-%S").to_string();
        if self.utc { stamp + "Z" } else { stamp }
    }
}

/// Where the dump is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A directory; the file name is derived from the title and timestamp
    Directory(PathBuf),
    /// An explicit file path
    File(PathBuf),
}

/// Configuration for a single dump run.
///
/// Use [`DumpConfig::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DumpConfig {
    /// Base for relative paths and for display paths in the document
    pub working_dir: PathBuf,

    /// Root directory to dump
    pub source_dir: PathBuf,

    /// Output location
    pub output: OutputTarget,

    /// Document title, also the base of generated file names
    pub title: String,

    /// Accepted extensions; empty accepts every extension
    pub extensions: FilterSet,

    /// Directory names pruned at any depth
    pub exclude_dirs: FilterSet,

    /// Include/exclude substrings on file names
    pub name_filter: NameFilter,

    /// Whether to write the counts and the header block
    pub write_header: bool,

    /// Capture time of the run
    pub timestamp: Timestamp,

    /// Extra paths the scan never enters or selects, such as a preferences
    /// file living inside the source tree
    pub skip_paths: Vec<PathBuf>,
}

impl DumpConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use code_dump::DumpConfig;
    ///
    /// let config = DumpConfig::builder()
    ///     .working_dir("/tmp")
    ///     .source_dir("project")
    ///     .extensions(".cs,.shader")
    ///     .exclude_dirs("Library,Temp")
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert!(config.extensions.contains(".CS"));
    /// ```
    #[must_use]
    pub fn builder() -> DumpConfigBuilder {
        DumpConfigBuilder::default()
    }

    /// Validates the configuration without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank while the file name has to be
    /// derived from it.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.output, OutputTarget::Directory(_)) && self.title.trim().is_empty() {
            return Err(Error::config(
                "title must not be empty when writing into an output directory",
            ));
        }

        if self.working_dir.as_os_str().is_empty() {
            return Err(Error::config("working directory must not be empty"));
        }

        Ok(())
    }

    /// File name generated for directory outputs: `<title>_<stamp>.md`.
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name_for(&self.title, &self.timestamp)
    }

    /// Resolves the source root to an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the path is not an existing directory.
    pub fn source_root(&self) -> Result<PathBuf> {
        let root = resolve_path(&self.working_dir, &self.source_dir);
        if !root.is_dir() {
            return Err(Error::not_found(root));
        }
        Ok(root)
    }

    /// Resolves the output file path.
    ///
    /// For directory targets the directory is created immediately; explicit
    /// files get their parent created when the dump is written.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the output directory cannot be created.
    pub fn output_file(&self) -> Result<PathBuf> {
        match &self.output {
            OutputTarget::Directory(dir) => {
                let dir = resolve_output_dir(&self.working_dir, dir)?;
                Ok(dir.join(self.file_name()))
            }
            OutputTarget::File(file) => Ok(resolve_path(&self.working_dir, file)),
        }
    }

    /// Absolute paths the scan must leave alone: the output location and
    /// every entry of `skip_paths`.
    ///
    /// Nothing is created on disk. For directory targets the whole output
    /// directory is included, so earlier dumps are never picked up again.
    #[must_use]
    pub fn skipped_paths(&self) -> Vec<PathBuf> {
        let output = match &self.output {
            OutputTarget::Directory(path) | OutputTarget::File(path) => path,
        };
        std::iter::once(output)
            .chain(&self.skip_paths)
            .map(|path| resolve_path(&self.working_dir, path))
            .collect()
    }

    /// Renders a path relative to the working directory.
    #[must_use]
    pub fn display_path(&self, path: &Path) -> String {
        crate::paths::display_relative(&self.working_dir, path)
    }
}

/// Builds `<title>_<stamp>.md`.
#[must_use]
pub(crate) fn file_name_for(title: &str, timestamp: &Timestamp) -> String {
    format!("{}_{}.{}", title.trim(), timestamp.file_stamp(), DUMP_EXTENSION)
}

/// Builder for creating a [`DumpConfig`].
#[derive(Debug, Default)]
pub struct DumpConfigBuilder {
    working_dir: Option<PathBuf>,
    source_dir: Option<PathBuf>,
    output: Option<OutputTarget>,
    title: Option<String>,
    extensions: FilterSet,
    exclude_dirs: FilterSet,
    include_name_contains: Option<String>,
    exclude_name_contains: Option<String>,
    write_header: Option<bool>,
    use_utc: Option<bool>,
    captured_at: Option<DateTime<FixedOffset>>,
    skip_paths: Vec<PathBuf>,
}

impl DumpConfigBuilder {
    /// Sets the working directory. Defaults to the process cwd.
    #[must_use]
    pub fn working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    /// Sets the source directory to dump.
    #[must_use]
    pub fn source_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(path.into());
        self
    }

    /// Writes into `path` using a generated, timestamped file name.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(OutputTarget::Directory(path.into()));
        self
    }

    /// Writes to exactly `path`.
    #[must_use]
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(OutputTarget::File(path.into()));
        self
    }

    /// Sets the document title and file name base.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets accepted extensions from comma-separated text.
    #[must_use]
    pub fn extensions(mut self, csv: impl AsRef<str>) -> Self {
        self.extensions = FilterSet::parse(csv.as_ref());
        self
    }

    /// Sets pruned directory names from comma-separated text.
    #[must_use]
    pub fn exclude_dirs(mut self, csv: impl AsRef<str>) -> Self {
        self.exclude_dirs = FilterSet::parse(csv.as_ref());
        self
    }

    /// Keeps only files whose name contains `text`.
    #[must_use]
    pub fn include_name_contains(mut self, text: impl Into<String>) -> Self {
        self.include_name_contains = Some(text.into());
        self
    }

    /// Drops files whose name contains `text`.
    #[must_use]
    pub fn exclude_name_contains(mut self, text: impl Into<String>) -> Self {
        self.exclude_name_contains = Some(text.into());
        self
    }

    /// Enables or disables the header block.
    #[must_use]
    pub fn write_header(mut self, enabled: bool) -> Self {
        self.write_header = Some(enabled);
        self
    }

    /// Renders timestamps in UTC instead of local time.
    #[must_use]
    pub fn use_utc(mut self, enabled: bool) -> Self {
        self.use_utc = Some(enabled);
        self
    }

    /// Pins the capture time instead of taking "now" at build time.
    #[must_use]
    pub fn captured_at(mut self, at: DateTime<FixedOffset>) -> Self {
        self.captured_at = Some(at);
        self
    }

    /// Adds a file or directory the scan must skip.
    #[must_use]
    pub fn skip_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_paths.push(path.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or
    /// validation fails.
    pub fn build(self) -> Result<DumpConfig> {
        let working_dir = match self.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| Error::io(".", e))?,
        };

        let utc = self.use_utc.unwrap_or(false);
        let timestamp = match self.captured_at {
            Some(at) => Timestamp::new(at, utc),
            None => Timestamp::now(utc),
        };

        let config = DumpConfig {
            working_dir,
            source_dir: self
                .source_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            output: self
                .output
                .unwrap_or_else(|| OutputTarget::Directory(PathBuf::from(DEFAULT_OUTPUT_DIR))),
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            extensions: self.extensions,
            exclude_dirs: self.exclude_dirs,
            name_filter: NameFilter::new(
                self.include_name_contains.as_deref(),
                self.exclude_name_contains.as_deref(),
            ),
            write_header: self.write_header.unwrap_or(true),
            timestamp,
            skip_paths: self.skip_paths,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use chrono::TimeZone;

    fn at(offset_hours: i32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 15, 30, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = DumpConfig::builder()
            .working_dir(temp.path())
            .build()
            .unwrap();

        assert_eq!(config.title, DEFAULT_TITLE);
        assert!(config.write_header);
        assert!(config.extensions.is_empty());
        assert!(config.exclude_dirs.is_empty());
        assert_eq!(
            config.output,
            OutputTarget::Directory(PathBuf::from(DEFAULT_OUTPUT_DIR))
        );
    }

    #[test]
    fn test_blank_title_rejected_for_directory_output() {
        let result = DumpConfig::builder()
            .working_dir("/tmp")
            .title("   ")
            .build();

        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_blank_title_allowed_for_file_output() {
        let config = DumpConfig::builder()
            .working_dir("/tmp")
            .title("")
            .output_file("dump.md")
            .build();

        assert!(config.is_ok());
    }

    #[test]
    fn test_local_stamps() {
        let ts = Timestamp::new(at(3), false);
        assert_eq!(ts.header_stamp(), "2024-05-01 15:30:00 +03:00");
        assert_eq!(ts.file_stamp(), "2024-05-01_15-30-00");
    }

    #[test]
    fn test_utc_stamps_normalize_offset() {
        let ts = Timestamp::new(at(3), true);
        assert!(ts.is_utc());
        assert_eq!(ts.header_stamp(), "2024-05-01T12:30:00Z");
        assert_eq!(ts.file_stamp(), "2024-05-01_12-30-00Z");
    }

    #[test]
    fn test_file_name() {
        let config = DumpConfig::builder()
            .working_dir("/tmp")
            .title("Snapshot")
            .use_utc(true)
            .captured_at(at(0))
            .build()
            .unwrap();

        assert_eq!(config.file_name(), "Snapshot_2024-05-01_15-30-00Z.md");
    }

    #[test]
    fn test_source_root_missing_is_not_found() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = DumpConfig::builder()
            .working_dir(temp.path())
            .source_dir("does/not/exist")
            .build()
            .unwrap();

        let err = config.source_root().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_source_root_file_is_not_found() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("plain.txt").write_str("x").unwrap();
        let config = DumpConfig::builder()
            .working_dir(temp.path())
            .source_dir("plain.txt")
            .build()
            .unwrap();

        assert!(config.source_root().unwrap_err().is_not_found());
    }

    #[test]
    fn test_output_file_in_directory_creates_it() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = DumpConfig::builder()
            .working_dir(temp.path())
            .output_dir("dumps/today")
            .captured_at(at(0))
            .build()
            .unwrap();

        let out = config.output_file().unwrap();

        assert!(temp.child("dumps/today").path().is_dir());
        assert_eq!(
            out,
            temp.path().join("dumps/today/CodeDump_2024-05-01_15-30-00.md")
        );
    }

    #[test]
    fn test_skipped_paths_cover_output_and_extras() {
        let config = DumpConfig::builder()
            .working_dir("/work")
            .output_dir("./dumps/../CodeDumps")
            .skip_path(".code-dump.json")
            .skip_path("/abs/other.json")
            .build()
            .unwrap();

        assert_eq!(
            config.skipped_paths(),
            vec![
                PathBuf::from("/work/CodeDumps"),
                PathBuf::from("/work/.code-dump.json"),
                PathBuf::from("/abs/other.json"),
            ]
        );
    }

    #[test]
    fn test_explicit_output_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = DumpConfig::builder()
            .working_dir(temp.path())
            .output_file("out/../bundle.md")
            .build()
            .unwrap();

        assert_eq!(config.output_file().unwrap(), temp.path().join("bundle.md"));
    }
}
