//! Fixed-size chunking strategy

use crate::domain::ingestion::{helpers, ChunkingConfig, ChunkingStrategy};

/// Chunking strategy that cuts flat character windows
///
/// Windows start every `chunk_size - chunk_overlap` characters and ignore
/// word or sentence boundaries.
#[derive(Debug, Clone, Default)]
pub struct FixedSizeChunker;

impl FixedSizeChunker {
    /// Create a new fixed-size chunker
    pub fn new() -> Self {
        Self
    }
}

impl ChunkingStrategy for FixedSizeChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Vec<String> {
        if content.is_empty() {
            return vec![];
        }

        let total = helpers::char_len(content);

        if total <= config.chunk_size {
            return vec![content.to_string()];
        }

        let offsets: Vec<usize> = content
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(content.len()))
            .collect();

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + config.chunk_size).min(total);
            chunks.push(content[offsets[start]..offsets[end]].to_string());

            if end >= total {
                break;
            }

            start += config.step();
        }

        chunks
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: i64, overlap: i64) -> ChunkingConfig {
        ChunkingConfig::new(size, overlap).unwrap()
    }

    #[test]
    fn test_empty_content() {
        let chunks = FixedSizeChunker::new().chunk("", &ChunkingConfig::default());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_small_content_is_untouched() {
        let chunks = FixedSizeChunker::new().chunk("  Hello, World!  ", &ChunkingConfig::default());
        assert_eq!(chunks, vec!["  Hello, World!  "]);
    }

    #[test]
    fn test_without_overlap() {
        let chunks = FixedSizeChunker::new().chunk("abcdefghij", &config(5, 0));
        assert_eq!(chunks, vec!["abcde", "fghij"]);
    }

    #[test]
    fn test_overlap_repeats_tail() {
        let chunks = FixedSizeChunker::new().chunk("abcdefghijklmnopqrstuvwxy", &config(10, 2));

        assert_eq!(chunks, vec!["abcdefghij", "ijklmnopqr", "qrstuvwxy"]);
        assert!(chunks[1].starts_with(&chunks[0][8..]));
    }

    #[test]
    fn test_respects_max_size() {
        let content = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let cfg = config(50, 10);
        let chunks = FixedSizeChunker::new().chunk(&content, &cfg);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(helpers::char_len(chunk) <= cfg.chunk_size);
        }
    }

    #[test]
    fn test_multibyte_content() {
        let content = "ñ".repeat(12);
        let chunks = FixedSizeChunker::new().chunk(&content, &config(5, 0));

        assert_eq!(chunks.len(), 3);
        assert_eq!(helpers::char_len(&chunks[2]), 2);
    }

    #[test]
    fn test_name() {
        assert_eq!(FixedSizeChunker::new().name(), "fixed");
    }
}
