//! Chunking strategy trait and types

use std::fmt::{self, Debug};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Splitting strategy selected by name in configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingType {
    /// Paragraphs, then lines, then sentences, then words, then characters
    #[default]
    Recursive,
    /// Flat character windows
    Fixed,
    /// Embedding-driven boundaries (not available)
    Semantic,
}

impl ChunkingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recursive => "recursive",
            Self::Fixed => "fixed",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for ChunkingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recursive" => Ok(Self::Recursive),
            "fixed" | "fixed_size" => Ok(Self::Fixed),
            "semantic" => Ok(Self::Semantic),
            other => Err(DomainError::validation(format!(
                "unknown chunking strategy '{}'",
                other
            ))),
        }
    }
}

/// Validated chunk window, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Build a configuration from raw (possibly negative) settings
    pub fn new(chunk_size: i64, chunk_overlap: i64) -> Result<Self, DomainError> {
        if chunk_size <= 0 {
            return Err(DomainError::validation(format!(
                "chunk_size must be positive, got {}",
                chunk_size
            )));
        }

        if chunk_overlap < 0 {
            return Err(DomainError::validation(format!(
                "chunk_overlap must not be negative, got {}",
                chunk_overlap
            )));
        }

        if chunk_overlap >= chunk_size {
            return Err(DomainError::validation(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size: chunk_size as usize,
            chunk_overlap: chunk_overlap as usize,
        })
    }

    /// Distance between the starts of consecutive windows
    pub fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Trait for chunking strategies
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split content into chunk texts, in document order
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Vec<String>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

/// Helper functions for chunking
pub mod helpers {
    /// Length in characters
    pub fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    /// Byte offset of the character at `char_pos`, or `text.len()` past the end
    pub fn byte_offset(text: &str, char_pos: usize) -> usize {
        text.char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    }

    /// Last `max_chars` characters of `text`, starting at a word boundary when one exists
    pub fn overlap_tail(text: &str, max_chars: usize) -> &str {
        if max_chars == 0 {
            return "";
        }

        let total = char_len(text);
        if total <= max_chars {
            return text;
        }

        let start = byte_offset(text, total - max_chars);
        let tail = &text[start..];

        if text[..start].ends_with(char::is_whitespace) {
            return tail.trim_start();
        }

        match tail.find(char::is_whitespace) {
            Some(ws) => tail[ws..].trim_start(),
            None => tail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_config_default() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.step(), 800);
    }

    #[test]
    fn test_chunking_config_validation() {
        assert!(ChunkingConfig::new(100, 50).is_ok());
        assert!(ChunkingConfig::new(100, 0).is_ok());

        let err = ChunkingConfig::new(0, 0).unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
        assert!(err.to_string().contains('0'));

        let err = ChunkingConfig::new(-5, 0).unwrap_err();
        assert!(err.to_string().contains("-5"));

        let err = ChunkingConfig::new(100, -1).unwrap_err();
        assert!(err.to_string().contains("chunk_overlap"));

        let err = ChunkingConfig::new(100, 100).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_chunking_type_parse() {
        assert_eq!("recursive".parse::<ChunkingType>().unwrap(), ChunkingType::Recursive);
        assert_eq!("Fixed".parse::<ChunkingType>().unwrap(), ChunkingType::Fixed);
        assert_eq!("semantic".parse::<ChunkingType>().unwrap(), ChunkingType::Semantic);
        assert!("sliding".parse::<ChunkingType>().is_err());
        assert_eq!(ChunkingType::default().to_string(), "recursive");
    }

    #[test]
    fn test_overlap_tail_snaps_to_word() {
        let text = "alpha beta gamma delta";
        assert_eq!(helpers::overlap_tail(text, 8), "delta");
        assert_eq!(helpers::overlap_tail(text, 0), "");
        assert_eq!(helpers::overlap_tail("short", 10), "short");
        assert_eq!(helpers::overlap_tail("one two three", 5), "three");
    }

    #[test]
    fn test_overlap_tail_multibyte() {
        let text = "héllo wörld ñandú";
        let tail = helpers::overlap_tail(text, 7);
        assert_eq!(tail, "ñandú");
    }

    #[test]
    fn test_byte_offset() {
        assert_eq!(helpers::byte_offset("héllo", 2), 3);
        assert_eq!(helpers::byte_offset("abc", 10), 3);
    }
}
