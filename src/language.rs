//! Extension to code-fence language tag mapping.

/// Extensions whose files are scanned for `class`/`struct`/`interface`
/// declarations.
const DECLARATION_EXTENSIONS: &[&str] = &[
    ".cs", ".java", ".kt", ".ts", ".js", ".swift", ".cpp", ".h",
];

/// Returns the code-fence tag for a lowercased extension (with dot).
///
/// Unknown extensions map to the empty tag, which yields an untagged fence.
#[must_use]
pub fn language_tag(ext: &str) -> &'static str {
    match ext {
        ".cs" => "csharp",
        ".shader" => "shaderlab",
        ".hlsl" | ".cginc" | ".compute" => "hlsl",
        ".glsl" => "glsl",
        ".jslib" | ".js" => "javascript",
        ".ts" => "typescript",
        ".json" => "json",
        ".uxml" | ".xml" => "xml",
        ".uss" | ".css" => "css",
        ".py" => "python",
        ".java" => "java",
        ".kt" => "kotlin",
        ".swift" => "swift",
        ".cpp" | ".cc" | ".cxx" | ".c" | ".h" | ".hpp" => "cpp",
        ".m" | ".mm" => "objectivec",
        ".rb" => "ruby",
        ".php" => "php",
        ".sql" => "sql",
        ".yml" | ".yaml" => "yaml",
        ".toml" => "toml",
        ".ini" => "ini",
        ".gradle" => "groovy",
        ".ps1" => "powershell",
        ".sh" | ".bash" => "bash",
        ".bat" | ".cmd" => "bat",
        ".md" => "markdown",
        _ => "",
    }
}

/// Returns true if files with this extension get a declaration count.
#[must_use]
pub(crate) fn counts_declarations(ext: &str) -> bool {
    DECLARATION_EXTENSIONS.contains(&ext)
}
