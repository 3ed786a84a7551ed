//! Recursive chunking strategy

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{helpers, ChunkingConfig, ChunkingStrategy};

/// Structural unit the text is split on, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Paragraph,
    Line,
    Sentence,
    Word,
    Character,
}

impl Boundary {
    fn finer(self) -> Self {
        match self {
            Self::Paragraph => Self::Line,
            Self::Line => Self::Sentence,
            Self::Sentence => Self::Word,
            Self::Word | Self::Character => Self::Character,
        }
    }

    fn joiner(self) -> &'static str {
        match self {
            Self::Paragraph => "\n\n",
            Self::Line => "\n",
            Self::Sentence | Self::Word => " ",
            Self::Character => "",
        }
    }

    fn split(self, text: &str) -> Vec<&str> {
        match self {
            Self::Paragraph => text
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect(),
            Self::Line => text
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.trim().is_empty())
                .collect(),
            Self::Sentence => text
                .unicode_sentences()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect(),
            Self::Word => text.split_whitespace().collect(),
            Self::Character => vec![text],
        }
    }
}

/// Chunking strategy that prefers the coarsest boundary that fits
///
/// Splitting order: paragraphs -> lines -> sentences -> words -> characters.
/// Adjacent pieces are merged up to `chunk_size`, and each new chunk starts
/// with the word-aligned tail of the previous one, up to `chunk_overlap`.
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker;

impl RecursiveChunker {
    /// Create a new recursive chunker
    pub fn new() -> Self {
        Self
    }

    fn recursive_chunk(text: &str, config: &ChunkingConfig, boundary: Boundary) -> Vec<String> {
        let text = text.trim();

        if text.is_empty() {
            return vec![];
        }

        if helpers::char_len(text) <= config.chunk_size {
            return vec![text.to_string()];
        }

        if boundary == Boundary::Character {
            return Self::split_by_size(text, config);
        }

        let parts = boundary.split(text);

        if parts.len() <= 1 {
            return Self::recursive_chunk(text, config, boundary.finer());
        }

        Self::merge(parts, config, boundary)
    }

    fn merge(parts: Vec<&str>, config: &ChunkingConfig, boundary: Boundary) -> Vec<String> {
        let separator = boundary.joiner();
        let separator_len = helpers::char_len(separator);

        let mut result = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        // Overlap from sub-chunks of an oversized part, used to seed the next chunk
        let mut carry: Option<String> = None;

        for part in parts {
            let part_len = helpers::char_len(part);

            if part_len > config.chunk_size {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                    current_len = 0;
                }

                let pieces = Self::recursive_chunk(part, config, boundary.finer());
                carry = pieces
                    .last()
                    .map(|last| helpers::overlap_tail(last, config.chunk_overlap).to_string())
                    .filter(|tail| !tail.is_empty());
                result.extend(pieces);
                continue;
            }

            if current.is_empty() {
                if let Some(tail) = carry.take() {
                    let tail_len = helpers::char_len(&tail);
                    if tail_len + separator_len + part_len <= config.chunk_size {
                        current.push_str(&tail);
                        current.push_str(separator);
                        current_len = tail_len + separator_len;
                    }
                }
                current.push_str(part);
                current_len += part_len;
            } else if current_len + separator_len + part_len <= config.chunk_size {
                current.push_str(separator);
                current.push_str(part);
                current_len += separator_len + part_len;
            } else {
                let finished = std::mem::take(&mut current);
                let tail = helpers::overlap_tail(&finished, config.chunk_overlap);
                let tail_len = helpers::char_len(tail);

                current_len = 0;
                if !tail.is_empty() && tail_len + separator_len + part_len <= config.chunk_size {
                    current.push_str(tail);
                    current.push_str(separator);
                    current_len = tail_len + separator_len;
                }
                current.push_str(part);
                current_len += part_len;

                result.push(finished);
            }
        }

        if !current.is_empty() {
            result.push(current);
        }

        result
    }

    fn split_by_size(text: &str, config: &ChunkingConfig) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut result = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + config.chunk_size).min(chars.len());
            result.push(chars[start..end].iter().collect());

            if end >= chars.len() {
                break;
            }

            start += config.step();
        }

        result
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Vec<String> {
        if content.is_empty() {
            return vec![];
        }

        if helpers::char_len(content) <= config.chunk_size {
            return vec![content.to_string()];
        }

        Self::recursive_chunk(content, config, Boundary::Paragraph)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: i64, overlap: i64) -> ChunkingConfig {
        ChunkingConfig::new(size, overlap).unwrap()
    }

    fn assert_within(chunks: &[String], size: usize) {
        for chunk in chunks {
            assert!(
                helpers::char_len(chunk) <= size,
                "chunk of {} chars exceeds {}: {:?}",
                helpers::char_len(chunk),
                size,
                chunk
            );
        }
    }

    #[test]
    fn test_empty_content() {
        let chunks = RecursiveChunker::new().chunk("", &ChunkingConfig::default());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_small_content() {
        let chunks = RecursiveChunker::new().chunk("Small content", &ChunkingConfig::default());
        assert_eq!(chunks, vec!["Small content"]);
    }

    #[test]
    fn test_split_by_paragraphs() {
        let content = "First paragraph here.\n\nSecond paragraph here.\n\nThird paragraph here.";
        let chunks = RecursiveChunker::new().chunk(content, &config(30, 0));

        assert_eq!(
            chunks,
            vec![
                "First paragraph here.",
                "Second paragraph here.",
                "Third paragraph here."
            ]
        );
    }

    #[test]
    fn test_merges_small_paragraphs() {
        let content = "One.\n\nTwo.\n\nThree is longer than the rest of them.";
        let chunks = RecursiveChunker::new().chunk(content, &config(40, 0));

        assert_eq!(chunks[0], "One.\n\nTwo.");
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_split_by_lines() {
        let content = "line one is here\nline two is here\nline three is here";
        let chunks = RecursiveChunker::new().chunk(content, &config(20, 0));

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1], "line two is here");
    }

    #[test]
    fn test_split_by_sentences() {
        let content = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = RecursiveChunker::new().chunk(content, &config(25, 0));

        assert_eq!(chunks.len(), 3);
        assert_within(&chunks, 25);
        assert_eq!(chunks[2], "Third sentence here.");
    }

    #[test]
    fn test_long_word_falls_back_to_characters() {
        let content = "x".repeat(45);
        let chunks = RecursiveChunker::new().chunk(&content, &config(20, 0));

        assert_eq!(chunks.len(), 3);
        assert_within(&chunks, 20);
        assert_eq!(chunks.concat(), content);
    }

    #[test]
    fn test_overlap_carries_previous_tail() {
        let content = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let chunks = RecursiveChunker::new().chunk(content, &config(24, 10));

        assert!(chunks.len() > 1);
        assert_within(&chunks, 24);

        for pair in chunks.windows(2) {
            let first_word = pair[1].split_whitespace().next().unwrap();
            assert!(
                pair[0].split_whitespace().any(|w| w == first_word),
                "{:?} should open with a word from {:?}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_respects_size_on_markdown() {
        let content = r#"# Introduction

This is the introduction paragraph.

# Main Content

This is the main content. It has multiple sentences. Each sentence adds to the content.

## Subsection

More detailed content here.

# Conclusion

Final thoughts."#;

        let cfg = config(60, 15);
        let chunks = RecursiveChunker::new().chunk(content, &cfg);

        assert!(chunks.len() >= 3);
        assert_within(&chunks, cfg.chunk_size);

        let combined = chunks.join(" ");
        assert!(combined.contains("Introduction"));
        assert!(combined.contains("Final thoughts."));
    }

    #[test]
    fn test_multibyte_sizes_count_characters() {
        let content = "ñandú ".repeat(40);
        let cfg = config(30, 5);
        let chunks = RecursiveChunker::new().chunk(&content, &cfg);

        assert!(chunks.len() > 1);
        assert_within(&chunks, cfg.chunk_size);
    }

    #[test]
    fn test_overlap_follows_split_paragraph() {
        let content = "Alpha beta gamma delta. Epsilon zeta eta theta. Iota kappa lambda mu.\n\nNu xi omicron pi.";
        let cfg = config(30, 10);
        let chunks = RecursiveChunker::new().chunk(content, &cfg);

        assert_within(&chunks, cfg.chunk_size);

        let last = chunks.last().unwrap();
        assert!(last.ends_with("Nu xi omicron pi."));
        assert!(last.starts_with("lambda mu."), "no overlap carried: {:?}", chunks);
    }

    #[test]
    fn test_name() {
        assert_eq!(RecursiveChunker::new().name(), "recursive");
    }
}
