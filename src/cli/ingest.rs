//! Ingest command - indexes one file

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;

use crate::domain::document::Metadata;
use crate::infrastructure::services::KnowledgeService;

/// Arguments for the ingest command
#[derive(Args, Clone, Debug)]
pub struct IngestArgs {
    /// File to ingest
    pub path: PathBuf,

    /// Extra metadata as key=value; values are parsed as JSON when possible
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_meta)]
    pub meta: Vec<(String, Value)>,
}

/// Run the ingest command
pub async fn run(service: &KnowledgeService, args: IngestArgs) -> anyhow::Result<()> {
    let metadata = if args.meta.is_empty() {
        None
    } else {
        Some(args.meta.into_iter().collect::<Metadata>())
    };

    let chunks = service.ingest_document(&args.path, metadata).await?;
    println!("Ingested {} ({} chunks)", args.path.display(), chunks);

    Ok(())
}

fn parse_meta(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err("metadata key must not be empty".to_string());
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_meta() {
        assert_eq!(
            parse_meta("team=platform").unwrap(),
            ("team".to_string(), json!("platform"))
        );
        assert_eq!(parse_meta("priority=3").unwrap(), ("priority".to_string(), json!(3)));
        assert_eq!(
            parse_meta("tags=[\"db\",\"pool\"]").unwrap(),
            ("tags".to_string(), json!(["db", "pool"]))
        );
        assert_eq!(parse_meta("note=a=b").unwrap(), ("note".to_string(), json!("a=b")));
    }

    #[test]
    fn test_parse_meta_invalid() {
        assert!(parse_meta("no-separator").is_err());
        assert!(parse_meta("=value").is_err());
    }
}
