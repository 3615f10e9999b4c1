//! File selection filters.
//!
//! Extension and directory lists arrive as comma-separated text and are held
//! as case-insensitive sets. Name filters are plain substrings matched
//! against a file's base name.

use std::collections::BTreeMap;
use std::path::Path;

/// Extensions that are always skipped, whatever the extension set says.
pub const SIDECAR_EXTENSIONS: &[&str] = &[".meta"];

/// Case-insensitive set of filter tokens parsed from comma-separated text.
///
/// Tokens starting with `.` are lowercased; other tokens keep the casing
/// of their first occurrence. Iteration is sorted case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    entries: BTreeMap<String, String>,
}

impl FilterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list, dropping empty tokens and duplicates.
    #[must_use]
    pub fn parse(csv: &str) -> Self {
        let mut set = Self::new();
        for token in csv.split(',') {
            set.insert(token);
        }
        set
    }

    /// Inserts a single token. Blank tokens are ignored.
    pub fn insert(&mut self, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            return;
        }
        let value = if token.starts_with('.') {
            token.to_lowercase()
        } else {
            token.to_string()
        };
        self.entries.entry(fold(&value)).or_insert(value);
    }

    /// Returns true if the set holds `token`, ignoring case.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(&fold(token))
    }

    /// Returns true if the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in case-insensitive order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Joins the entries with `", "` for display.
    #[must_use]
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(", ")
    }
}

impl<'a> FromIterator<&'a str> for FilterSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

/// Include/exclude substring filters on a file's base name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    include: Option<String>,
    exclude: Option<String>,
}

impl NameFilter {
    /// Creates a filter. Blank substrings disable the respective check.
    #[must_use]
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include: non_blank(include),
            exclude: non_blank(exclude),
        }
    }

    /// The include substring, if any.
    #[must_use]
    pub fn include(&self) -> Option<&str> {
        self.include.as_deref()
    }

    /// The exclude substring, if any.
    #[must_use]
    pub fn exclude(&self) -> Option<&str> {
        self.exclude.as_deref()
    }

    /// Returns true if a file with base name `name` passes both checks.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        if let Some(ref include) = self.include {
            if !name.contains(&include.to_lowercase()) {
                return false;
            }
        }
        if let Some(ref exclude) = self.exclude {
            if name.contains(&exclude.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Lowercased extension of `path` including its leading dot.
///
/// The extension runs from the last `.` of the file name; a trailing dot
/// means no extension, and a dotfile such as `.gitignore` is all extension.
#[must_use]
pub fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return String::new();
    };
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// Returns true if `ext` is one of the always-skipped sidecar extensions.
#[must_use]
pub(crate) fn is_sidecar(ext: &str) -> bool {
    SIDECAR_EXTENSIONS.contains(&ext)
}

fn fold(token: &str) -> String {
    token.to_uppercase()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_dedupes() {
        let set = FilterSet::parse(" .CS, .cs ,,.Shader,  ");
        assert_eq!(set.len(), 2);
        assert!(set.contains(".cs"));
        assert!(set.contains(".SHADER"));
        assert_eq!(set.joined(), ".cs, .shader");
    }

    #[test]
    fn test_parse_keeps_casing_without_dot() {
        let set = FilterSet::parse("Temp,temp,Library");
        assert_eq!(set.len(), 2);
        assert!(set.contains("TEMP"));
        assert_eq!(set.joined(), "Library, Temp");
    }

    #[test]
    fn test_parse_empty_is_no_filter() {
        assert!(FilterSet::parse("").is_empty());
        assert!(FilterSet::parse(" , ,").is_empty());
    }

    #[test]
    fn test_set_ignores_input_order() {
        assert_eq!(FilterSet::parse(".a,.b,.c"), FilterSet::parse(".c,.a,.b"));
    }

    #[test]
    fn test_extension_without_dot_is_literal() {
        let set = FilterSet::parse("cs");
        assert!(!set.contains(".cs"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("dir/Player.CS")), ".cs");
        assert_eq!(extension_of(Path::new("Player.cs.meta")), ".meta");
        assert_eq!(extension_of(Path::new(".gitignore")), ".gitignore");
        assert_eq!(extension_of(Path::new("Makefile")), "");
        assert_eq!(extension_of(Path::new("trailing.")), "");
    }

    #[test]
    fn test_sidecar() {
        assert!(is_sidecar(".meta"));
        assert!(!is_sidecar(".cs"));
    }

    #[test]
    fn test_name_filter() {
        let filter = NameFilter::new(Some("player"), Some("test"));
        assert!(filter.accepts("PlayerController.cs"));
        assert!(!filter.accepts("Enemy.cs"));
        assert!(!filter.accepts("PlayerTests.cs"));
    }

    #[test]
    fn test_blank_name_filter_accepts_all() {
        let filter = NameFilter::new(Some("  "), None);
        assert_eq!(filter.include(), None);
        assert!(filter.accepts("anything.txt"));
    }
}
