//! Document format detection
//!
//! Every file maps to exactly one `DocumentFormat`; the loader for that
//! format is chosen by matching on the variant.

use std::path::Path;

/// Languages whose top-level definitions are extracted with a syntax tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Python,
    Rust,
}

/// Script dialects loaded verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    JavaScript,
    TypeScript,
}

/// Closed set of loadable formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Markdown with optional YAML frontmatter
    Markdown,
    /// Source code with structural extraction
    StructuredSource(SourceLanguage),
    /// JavaScript family, content kept as-is
    TypedSource(ScriptDialect),
    /// Anything else, decoded as text
    PlainText,
}

impl DocumentFormat {
    /// Detect the format from a path's extension, case-insensitively
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        Self::from_extension(&ext)
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "md" | "markdown" => Self::Markdown,
            "py" => Self::StructuredSource(SourceLanguage::Python),
            "rs" => Self::StructuredSource(SourceLanguage::Rust),
            "js" | "jsx" | "mjs" | "cjs" => Self::TypedSource(ScriptDialect::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Self::TypedSource(ScriptDialect::TypeScript),
            _ => Self::PlainText,
        }
    }

    /// Value recorded under the `file_type` metadata key
    pub fn file_type(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::StructuredSource(SourceLanguage::Python) => "python",
            Self::StructuredSource(SourceLanguage::Rust) => "rust",
            Self::TypedSource(ScriptDialect::JavaScript) => "javascript",
            Self::TypedSource(ScriptDialect::TypeScript) => "typescript",
            Self::PlainText => "text",
        }
    }

    /// Value recorded under the `language` metadata key
    pub fn language(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::StructuredSource(SourceLanguage::Python) => "python",
            Self::StructuredSource(SourceLanguage::Rust) => "rust",
            Self::TypedSource(_) => "javascript",
            Self::PlainText => "text",
        }
    }
}
