use crate::{
    config::DumpConfig,
    error::{Error, Result},
    file::FileData,
    paths::ensure_parent,
};
use std::{fmt::Write as _, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const INITIAL_CAPACITY: usize = 1024 * 1024;

/// A fully composed dump with its totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Document {
    /// Complete document text
    pub(crate) text: String,

    /// Number of file sections
    pub(crate) file_count: usize,

    /// Sum of per-file line counts
    pub(crate) line_count: u64,

    /// Sum of per-file declaration counts
    pub(crate) class_count: u64,
}

/// Accumulates file sections and counters in a single pass.
pub(crate) struct Aggregator {
    header: Option<String>,
    body: String,
    file_count: usize,
    line_count: u64,
    class_count: u64,
}

impl Aggregator {
    /// Starts a document for `config`; `source_root` is the resolved root.
    pub(crate) fn new(config: &DumpConfig, source_root: &Path) -> Self {
        let header = config
            .write_header
            .then(|| render_header(config, source_root));

        Self {
            header,
            body: String::with_capacity(INITIAL_CAPACITY),
            file_count: 0,
            line_count: 0,
            class_count: 0,
        }
    }

    /// Appends one file section and adds its counts to the totals.
    pub(crate) fn push(&mut self, file: &FileData) {
        let lines = file.line_count();
        let classes = file.declaration_count();

        let _ = writeln!(self.body, "## {}", file.relative_path);
        self.body.push('\n');
        let _ = writeln!(self.body, "```{}", file.language());
        self.body.push_str(&file.content);
        if !file.content.ends_with('\n') {
            self.body.push('\n');
        }
        self.body.push_str("```\n\n");

        self.file_count += 1;
        self.line_count += lines;
        self.class_count += classes;

        debug!(
            "Added {} ({} lines, {} declarations)",
            file.relative_path, lines, classes
        );
    }

    /// Finishes the document, placing the totals and the header first.
    pub(crate) fn finish(self) -> Document {
        let text = match self.header {
            Some(header) => {
                let mut text =
                    String::with_capacity(header.len() + self.body.len() + 64);
                let _ = write!(
                    text,
                    "Files: {}\nLines: {}\nClasses: {}\n\n",
                    self.file_count, self.line_count, self.class_count
                );
                text.push_str(&header);
                text.push_str(&self.body);
                text
            }
            None => self.body,
        };

        Document {
            text,
            file_count: self.file_count,
            line_count: self.line_count,
            class_count: self.class_count,
        }
    }
}

/// Renders the descriptive header block.
fn render_header(config: &DumpConfig, source_root: &Path) -> String {
    let source = match config.display_path(source_root) {
        s if s.is_empty() => ".".to_string(),
        s => s,
    };

    let mut header = String::new();
    let _ = writeln!(header, "# {}", config.title);
    header.push('\n');
    let _ = writeln!(header, "Generated: {}", config.timestamp.header_stamp());
    let _ = writeln!(header, "Source: {source}");
    let _ = writeln!(header, "Extensions: {}", config.extensions.joined());
    let _ = writeln!(header, "Exclude Dirs: {}", config.exclude_dirs.joined());
    if let Some(include) = config.name_filter.include() {
        let _ = writeln!(header, "Include Filter: {include}");
    }
    if let Some(exclude) = config.name_filter.exclude() {
        let _ = writeln!(header, "Exclude Filter: {exclude}");
    }
    header.push('\n');
    header
}

/// Writes `content` to `path` through a synced temporary file and a rename.
///
/// The temporary file gets a unique name next to `path`, so no other file is
/// touched, and it is removed again if any step fails. Missing ancestor
/// directories are created. The text is written as plain UTF-8 with no
/// byte-order mark.
///
/// # Errors
///
/// Returns an IO error if any step fails.
pub(crate) fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::io(temp_file.path(), e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(temp_file.path(), e))?;

    temp_file
        .persist(path)
        .map_err(|e| Error::io(path, e.error))?;

    info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
