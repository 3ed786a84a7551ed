//! Query command - prints retrieved context

use clap::Args;

use crate::infrastructure::services::KnowledgeService;

/// Arguments for the query command
#[derive(Args, Clone, Debug)]
pub struct QueryArgs {
    /// Question or description to search for
    pub text: String,

    /// Error signature to add to the search; repeatable
    #[arg(long = "error-pattern", value_name = "PATTERN")]
    pub error_patterns: Vec<String>,

    /// Number of results (defaults to knowledge.top_k)
    #[arg(long)]
    pub top_k: Option<usize>,
}

/// Run the query command
pub async fn run(service: &KnowledgeService, args: QueryArgs) -> anyhow::Result<()> {
    let patterns = (!args.error_patterns.is_empty()).then_some(args.error_patterns.as_slice());
    let context = service.query_knowledge(&args.text, patterns, args.top_k).await;

    println!("{}", context);
    Ok(())
}
