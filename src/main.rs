use clap::Parser;
use knowledge_pipeline::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let service = cli::bootstrap(cli.config.as_deref())?;

    match cli.command {
        Command::Ingest(args) => cli::ingest::run(&service, args).await,
        Command::IngestDir(args) => cli::ingest_dir::run(&service, args).await,
        Command::Query(args) => cli::query::run(&service, args).await,
        Command::Sources => cli::sources::run(&service).await,
    }
}
