//! Retrieval outcomes and context formatting

use std::fmt;

use crate::domain::document::Document;

pub const NO_RESULTS_MESSAGE: &str = "No relevant documentation found.";
pub const DISABLED_MESSAGE: &str = "Knowledge base is not enabled.";
pub const UNAVAILABLE_MESSAGE: &str =
    "Knowledge base is not available. Check the index configuration and logs.";

/// Longest query prefix echoed back in a degraded result
pub const QUERY_PREVIEW_CHARS: usize = 100;

/// Result of a knowledge query; never an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Formatted context (possibly the no-results message)
    Context(String),
    /// Retrieval is switched off in configuration
    Disabled,
    /// The index could not be initialized
    Unavailable,
    /// The search itself failed
    Degraded {
        error_type: String,
        query_preview: String,
    },
}

impl QueryOutcome {
    pub fn degraded(error_type: impl Into<String>, query: &str) -> Self {
        Self::Degraded {
            error_type: error_type.into(),
            query_preview: query_preview(query),
        }
    }

    pub fn is_context(&self) -> bool {
        matches!(self, Self::Context(_))
    }

    /// Render as the string handed back to the caller
    pub fn into_text(self) -> String {
        match self {
            Self::Context(text) => text,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context(text) => f.write_str(text),
            Self::Disabled => f.write_str(DISABLED_MESSAGE),
            Self::Unavailable => f.write_str(UNAVAILABLE_MESSAGE),
            Self::Degraded {
                error_type,
                query_preview,
            } => write!(
                f,
                "Knowledge retrieval failed ({}) for query: {}",
                error_type, query_preview
            ),
        }
    }
}

/// Append error patterns to the query, space separated
pub fn enhance_query(query_text: &str, error_patterns: Option<&[String]>) -> String {
    match error_patterns {
        Some(patterns) if !patterns.is_empty() => {
            format!("{} {}", query_text, patterns.join(" "))
        }
        _ => query_text.to_string(),
    }
}

/// Render ranked results as numbered blocks
pub fn format_results(results: &[Document]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            format!(
                "Document {} (source: {})\n{}",
                i + 1,
                doc.source().unwrap_or("unknown"),
                doc.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// First `QUERY_PREVIEW_CHARS` characters of the query
pub fn query_preview(query: &str) -> String {
    query.chars().take(QUERY_PREVIEW_CHARS).collect()
}
