//! # code-dump
//!
//! Bundles a source tree into a single, timestamped Markdown document.
//!
//! ## Features
//!
//! - Extension and directory-name filters parsed from plain comma-separated text
//! - Include/exclude substrings on file names
//! - Deterministic, case-insensitive file ordering
//! - Fenced code blocks tagged with the file's language
//! - File, line and (approximate) class/struct/interface totals
//! - Atomic writes: a failed run leaves no partial document behind
//!
//! ## Quick Start
//!
//! ```no_run
//! use code_dump::{DumpConfig, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = DumpConfig::builder()
//!     .source_dir("Assets")
//!     .output_dir("CodeDumps")
//!     .extensions(".cs,.shader")
//!     .exclude_dirs("Library,Temp")
//!     .build()?;
//!
//! let result = Pipeline::new(config)?.run()?;
//! println!("{} files, {} lines", result.file_count, result.line_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Each run is a three-stage pipeline:
//! 1. **Resolve**: anchors the source and output paths at the working directory
//! 2. **Select**: walks the tree, prunes excluded directories, filters files
//! 3. **Aggregate**: reads every file into one document and writes it

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod file;
mod filter;
mod language;
mod paths;
mod pipeline;
mod preferences;
mod scanner;
mod writer;

pub mod api;

pub use config::{
    DEFAULT_EXCLUDE_DIRS, DEFAULT_EXTENSIONS, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR,
    DEFAULT_TITLE, DumpConfig, DumpConfigBuilder, OutputTarget, Timestamp,
};
pub use error::{Error, Result};
pub use file::{FileData, count_declarations, count_lines};
pub use filter::{FilterSet, NameFilter, SIDECAR_EXTENSIONS, extension_of};
pub use language::language_tag;
pub use pipeline::{DumpResult, Pipeline};
pub use preferences::{DEFAULT_PREFERENCES_FILE, JsonFileStore, PreferenceStore, Preferences};

/// Runs a complete dump with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The source directory doesn't exist
/// - A directory cannot be enumerated or a file cannot be read
/// - The output file cannot be written
///
/// # Examples
///
/// ```no_run
/// use code_dump::{DumpConfig, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = DumpConfig::builder()
///     .source_dir(".")
///     .output_file("snapshot.md")
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: DumpConfig) -> Result<DumpResult> {
    Pipeline::new(config)?.run()
}
