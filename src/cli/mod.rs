//! CLI module for the knowledge pipeline
//!
//! Provides subcommands for working with the knowledge index:
//! - `ingest`: load and index a single file
//! - `ingest-dir`: index every matching file under a directory
//! - `query`: print the retrieved context for a question
//! - `sources`: list indexed sources (backends with listing support)

pub mod ingest;
pub mod ingest_dir;
pub mod query;
pub mod sources;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::observability::init_tracing;
use crate::infrastructure::services::KnowledgeService;

/// Knowledge pipeline - document ingestion and vector retrieval
#[derive(Parser)]
#[command(name = "kpipe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Additional configuration file, layered over config/default and config/local
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest a single document
    Ingest(ingest::IngestArgs),

    /// Ingest all matching documents under a directory
    IngestDir(ingest_dir::IngestDirArgs),

    /// Query the knowledge index
    Query(query::QueryArgs),

    /// List indexed sources
    Sources,
}

/// Load configuration, install tracing and build the service
pub fn bootstrap(config_file: Option<&Path>) -> anyhow::Result<KnowledgeService> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load_with(config_file).context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    let service = KnowledgeService::from_config(&config)?;
    Ok(service)
}
