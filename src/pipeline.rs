use crate::{
    config::DumpConfig,
    error::Result,
    file::FileData,
    scanner::Scanner,
    writer::{Aggregator, Document, write_file_atomic},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

/// Outcome of a completed dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpResult {
    /// Absolute path of the written document
    pub output_path: PathBuf,

    /// Number of files dumped
    pub file_count: usize,

    /// Total lines across all dumped files
    pub line_count: u64,

    /// Approximate number of type declarations across all dumped files
    pub class_count: u64,
}

impl DumpResult {
    /// One-line status suitable for a terminal, with the output path shown
    /// relative to `config`'s working directory.
    #[must_use]
    pub fn status_line(&self, config: &DumpConfig) -> String {
        format!(
            "Done • Files: {} • Classes: {} • Lines: {} • {}",
            self.file_count,
            self.class_count,
            self.line_count,
            config.display_path(&self.output_path)
        )
    }
}

/// Resolves, selects, aggregates and writes one dump.
pub struct Pipeline {
    config: DumpConfig,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: DumpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this pipeline runs with.
    #[must_use]
    pub const fn config(&self) -> &DumpConfig {
        &self.config
    }

    /// Executes the dump and returns its totals.
    ///
    /// # Process
    ///
    /// 1. **Resolve**: anchors source and output paths at the working directory
    /// 2. **Select**: walks the source tree and sorts the candidates
    /// 3. **Aggregate**: reads each file into the in-memory document
    /// 4. **Write**: persists the document in one step
    ///
    /// Nothing is written if any file fails to read.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the source directory is missing
    /// and an IO error if enumeration, reading or writing fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use code_dump::{DumpConfig, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = DumpConfig::builder()
    ///     .source_dir("./src")
    ///     .extensions(".rs,.toml")
    ///     .build()?;
    ///
    /// let result = Pipeline::new(config)?.run()?;
    /// println!("{} files", result.file_count);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(source = %self.config.source_dir.display()))]
    pub fn run(&self) -> Result<DumpResult> {
        let start_time = Instant::now();

        info!("Stage 1/3: Resolving paths...");
        let source_root = self.config.source_root()?;
        let output_path = self.config.output_file()?;

        info!("Stage 2/3: Selecting files under {}", source_root.display());
        let scanner = Scanner::new(source_root.clone(), &self.config);
        let files = scanner.scan()?;
        info!("✓ Selected {} files", files.len());

        info!("Stage 3/3: Dumping to {}", output_path.display());
        let document = self.dump_files(&source_root, &files, &output_path)?;

        info!(
            "✓ Dumped {} files ({} lines, {} classes) in {:.2}s",
            document.file_count,
            document.line_count,
            document.class_count,
            start_time.elapsed().as_secs_f64()
        );

        Ok(DumpResult {
            output_path,
            file_count: document.file_count,
            line_count: document.line_count,
            class_count: document.class_count,
        })
    }

    /// Reads `files` into one document and writes it to `output_path`.
    ///
    /// The first file that cannot be read aborts the dump before anything
    /// is written.
    fn dump_files(
        &self,
        source_root: &Path,
        files: &[PathBuf],
        output_path: &Path,
    ) -> Result<Document> {
        let mut aggregator = Aggregator::new(&self.config, source_root);
        for path in files {
            let relative = self.config.display_path(path);
            let data = FileData::load(path, relative)?;
            aggregator.push(&data);
        }
        let document = aggregator.finish();

        write_file_atomic(output_path, &document.text)?;
        Ok(document)
    }
}
