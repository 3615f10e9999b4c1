use crate::{
    config::DumpConfig,
    error::Result,
    filter::{FilterSet, NameFilter, extension_of, is_sidecar},
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Statistics collected during selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanStats {
    /// Directories entered
    pub(crate) directories: usize,

    /// Directories pruned by name, including their whole subtree
    pub(crate) pruned_directories: usize,

    /// Files looked at
    pub(crate) files_seen: usize,

    /// Files dropped by extension or sidecar rules
    pub(crate) rejected_by_extension: usize,

    /// Files dropped by include/exclude name filters
    pub(crate) rejected_by_name: usize,

    /// Dump outputs and other skipped paths left out of the walk
    pub(crate) skipped: usize,
}

/// Walks a source tree and selects the files to dump.
pub(crate) struct Scanner {
    root: PathBuf,
    extensions: FilterSet,
    exclude_dirs: FilterSet,
    name_filter: NameFilter,
    skip: Vec<PathBuf>,
}

impl Scanner {
    /// Creates a scanner for an already resolved root.
    pub(crate) fn new(root: PathBuf, config: &DumpConfig) -> Self {
        Self {
            root,
            extensions: config.extensions.clone(),
            exclude_dirs: config.exclude_dirs.clone(),
            name_filter: config.name_filter.clone(),
            skip: config.skipped_paths(),
        }
    }

    /// Returns the sorted list of candidate files.
    ///
    /// Directories whose leaf name is excluded are pruned without being
    /// entered, and the root itself is subject to the same check. The dump's
    /// own output location and any configured skip paths are left out too.
    /// The result is ordered case-insensitively by full path.
    ///
    /// # Errors
    ///
    /// Returns an IO error if a directory cannot be enumerated.
    pub(crate) fn scan(&self) -> Result<Vec<PathBuf>> {
        let (files, stats) = self.scan_with_stats()?;
        debug!(
            "Scan complete: {} dirs, {} pruned, {} skipped, {} files seen, \
             {} rejected by extension, {} rejected by name, {} selected",
            stats.directories,
            stats.pruned_directories,
            stats.skipped,
            stats.files_seen,
            stats.rejected_by_extension,
            stats.rejected_by_name,
            files.len()
        );
        Ok(files)
    }

    fn scan_with_stats(&self) -> Result<(Vec<PathBuf>, ScanStats)> {
        let mut stats = ScanStats::default();
        let mut pruned = 0usize;
        let mut skipped = 0usize;
        let mut files = Vec::new();

        debug!("Starting scan of {}", self.root.display());

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if self.is_skipped(entry.path()) {
                    debug!("Skipping dump output {}", entry.path().display());
                    skipped += 1;
                    return false;
                }
                if self.is_excluded_dir(entry) {
                    debug!("Pruning excluded directory {}", entry.path().display());
                    pruned += 1;
                    return false;
                }
                true
            });

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                stats.directories += 1;
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            stats.files_seen += 1;
            let path = entry.path();

            if !self.accepts_extension(path) {
                trace!("Skipping by extension: {}", path.display());
                stats.rejected_by_extension += 1;
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.name_filter.accepts(&name) {
                trace!("Skipping by name filter: {}", path.display());
                stats.rejected_by_name += 1;
                continue;
            }

            files.push(entry.into_path());
        }

        stats.pruned_directories = pruned;
        stats.skipped = skipped;
        sort_case_insensitive(&mut files);
        Ok((files, stats))
    }

    fn is_skipped(&self, path: &Path) -> bool {
        self.skip.iter().any(|skip| skip == path)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir() && self.exclude_dirs.contains(&leaf_name(entry.path()))
    }

    fn accepts_extension(&self, path: &Path) -> bool {
        let ext = extension_of(path);
        if is_sidecar(&ext) {
            return false;
        }
        self.extensions.is_empty() || self.extensions.contains(&ext)
    }
}

/// Leaf name of a path; empty for filesystem roots.
fn leaf_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sorts paths by their upper-cased string form, falling back to the exact
/// form so that the order stays total.
fn sort_case_insensitive(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| {
        let raw = p.to_string_lossy().into_owned();
        (raw.to_uppercase(), raw)
    });
}
