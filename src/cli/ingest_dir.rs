//! Ingest-dir command - indexes a directory tree

use std::path::PathBuf;

use clap::Args;

use crate::domain::ingestion::{ChunkingType, DirectoryIngestOptions, IngestionSummary};
use crate::infrastructure::services::KnowledgeService;

/// Arguments for the ingest-dir command
#[derive(Args, Clone, Debug)]
pub struct IngestDirArgs {
    /// Directory to ingest
    pub path: PathBuf,

    /// Filename glob pattern; repeatable. Defaults to common document and source types
    #[arg(long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Only ingest files directly inside the directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Stop after this many files
    #[arg(long, allow_negative_numbers = true)]
    pub max_files: Option<i64>,

    /// Chunking strategy (recursive, fixed, semantic)
    #[arg(long)]
    pub strategy: Option<ChunkingType>,
}

impl IngestDirArgs {
    fn options(&self) -> DirectoryIngestOptions {
        DirectoryIngestOptions {
            patterns: (!self.patterns.is_empty()).then(|| self.patterns.clone()),
            recursive: !self.no_recursive,
            strategy: self.strategy,
            max_files: self.max_files,
        }
    }
}

/// Run the ingest-dir command
pub async fn run(service: &KnowledgeService, args: IngestDirArgs) -> anyhow::Result<()> {
    let summary = service.ingest_directory(&args.path, args.options()).await?;
    print!("{}", render_summary(&summary));
    Ok(())
}

fn render_summary(summary: &IngestionSummary) -> String {
    let mut out = format!(
        "Processed {} files, {} chunks\n",
        summary.files_processed, summary.total_chunks
    );

    if !summary.errors.is_empty() {
        out.push_str(&format!("{} errors:\n", summary.errors.len()));
        for error in &summary.errors {
            out.push_str(&format!("  {}\n", error));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> IngestDirArgs {
        IngestDirArgs {
            path: PathBuf::from("docs"),
            patterns: Vec::new(),
            no_recursive: false,
            max_files: None,
            strategy: None,
        }
    }

    #[test]
    fn test_default_options() {
        let options = args().options();
        assert!(options.patterns.is_none());
        assert!(options.recursive);
        assert!(options.max_files.is_none());
    }

    #[test]
    fn test_options_from_flags() {
        let args = IngestDirArgs {
            patterns: vec!["*.rs".to_string()],
            no_recursive: true,
            max_files: Some(5),
            strategy: Some(ChunkingType::Fixed),
            ..args()
        };

        let options = args.options();
        assert_eq!(options.patterns, Some(vec!["*.rs".to_string()]));
        assert!(!options.recursive);
        assert_eq!(options.max_files, Some(5));
        assert_eq!(options.strategy, Some(ChunkingType::Fixed));
    }

    #[test]
    fn test_render_summary() {
        let summary = IngestionSummary {
            files_processed: 2,
            total_chunks: 7,
            errors: vec!["/docs/bad.md: invalid UTF-8".to_string()],
        };

        let text = render_summary(&summary);
        assert!(text.starts_with("Processed 2 files, 7 chunks"));
        assert!(text.contains("1 errors:"));
        assert!(text.contains("  /docs/bad.md: invalid UTF-8"));
    }
}
