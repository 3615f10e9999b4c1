use crate::error::{Error, Result};
use crate::filter::extension_of;
use crate::language::{counts_declarations, language_tag};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Heuristic for type declarations. Comments and string literals are not
/// excluded, so the resulting count is an estimate.
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(class|struct|interface)\s+[A-Za-z_][A-Za-z0-9_]*")
        .expect("declaration pattern is valid")
});

/// A selected file with its decoded content.
#[derive(Debug, Clone)]
pub struct FileData {
    /// Absolute path to the file
    pub absolute_path: PathBuf,

    /// Path relative to the working directory, `/`-separated
    pub relative_path: String,

    /// Lowercased extension including the leading dot
    pub extension: String,

    /// Decoded text content
    pub content: String,
}

impl FileData {
    /// Creates file data from already-loaded content.
    #[must_use]
    pub fn new(absolute_path: PathBuf, relative_path: String, content: String) -> Self {
        let extension = extension_of(&absolute_path);
        Self {
            absolute_path,
            relative_path,
            extension,
            content,
        }
    }

    /// Reads a file from disk.
    ///
    /// A leading UTF-8 byte-order mark is dropped and invalid UTF-8 is
    /// replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read.
    pub fn load(absolute_path: &Path, relative_path: String) -> Result<Self> {
        let bytes = fs::read(absolute_path).map_err(|e| Error::io(absolute_path, e))?;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
        let content = match String::from_utf8_lossy(body) {
            Cow::Borrowed(s) => s.to_string(),
            Cow::Owned(s) => {
                warn!("Invalid UTF-8 in {}, replaced undecodable bytes", relative_path);
                s
            }
        };
        Ok(Self::new(absolute_path.to_path_buf(), relative_path, content))
    }

    /// Code-fence language tag for this file.
    #[must_use]
    pub fn language(&self) -> &'static str {
        language_tag(&self.extension)
    }

    /// Number of lines, counting a final unterminated line.
    #[must_use]
    pub fn line_count(&self) -> u64 {
        count_lines(&self.content)
    }

    /// Approximate number of type declarations.
    #[must_use]
    pub fn declaration_count(&self) -> u64 {
        count_declarations(&self.content, &self.extension)
    }
}

/// Counts `\n` bytes, plus one for a trailing line without a newline.
#[must_use]
pub fn count_lines(text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut count = memchr::memchr_iter(b'\n', bytes).count() as u64;
    if bytes.last().is_some_and(|&b| b != b'\n') {
        count += 1;
    }
    count
}

/// Counts `class`/`struct`/`interface` declarations for class-capable
/// extensions; every other extension yields zero.
#[must_use]
pub fn count_declarations(text: &str, ext: &str) -> u64 {
    if !counts_declarations(ext) {
        return 0;
    }
    DECLARATION.find_iter(text).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines("a\nb"), 2);
        assert_eq!(count_lines("a\nb\n"), 2);
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("\n\n"), 2);
        assert_eq!(count_lines("single"), 1);
    }

    #[test]
    fn test_count_declarations_recognized() {
        let text = "class Foo {}\nstruct Bar;\ninterface Baz {}";
        assert_eq!(count_declarations(text, ".cs"), 3);
        assert_eq!(count_declarations(text, ".txt"), 0);
    }

    #[test]
    fn test_count_declarations_needs_identifier() {
        assert_eq!(count_declarations("class 9abc", ".java"), 0);
        assert_eq!(count_declarations("subclass Foo", ".java"), 0);
        assert_eq!(count_declarations("public sealed class _Impl<T>", ".cs"), 1);
    }

    #[test]
    fn test_load_strips_bom() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("Bom.cs");
        file.write_binary(b"\xEF\xBB\xBFclass Bom {}").unwrap();

        let data = FileData::load(file.path(), "Bom.cs".to_string()).unwrap();

        assert_eq!(data.content, "class Bom {}");
        assert_eq!(data.extension, ".cs");
        assert_eq!(data.language(), "csharp");
        assert_eq!(data.declaration_count(), 1);
    }

    #[test]
    fn test_load_invalid_utf8_is_lossy() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("bad.txt");
        file.write_binary(b"ok\xFF\n").unwrap();

        let data = FileData::load(file.path(), "bad.txt".to_string()).unwrap();

        assert!(data.content.starts_with("ok"));
        assert_eq!(data.line_count(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let missing = temp.path().join("gone.cs");

        let err = FileData::load(&missing, "gone.cs".to_string()).unwrap_err();
        assert!(err.is_io());
    }
}
