//! Sources command - lists indexed sources

use crate::infrastructure::services::KnowledgeService;

/// Run the sources command
pub async fn run(service: &KnowledgeService) -> anyhow::Result<()> {
    let sources = service.list_sources().await?;

    if sources.is_empty() {
        println!("No sources indexed.");
        return Ok(());
    }

    for info in sources {
        println!("{:>6}  {}", info.chunk_count, info.source);
    }

    Ok(())
}
