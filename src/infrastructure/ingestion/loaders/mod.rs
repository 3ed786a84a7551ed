//! Document loaders, one per `DocumentFormat`

pub mod markdown;
pub mod plain_text;
pub mod source_code;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::document::{keys, Document, Metadata};
use crate::domain::ingestion::{helpers, DocumentFormat};
use crate::domain::DomainError;
use crate::infrastructure::filesystem::PathGuard;

/// Reads a file through the path guard and turns it into a `Document`
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    guard: PathGuard,
}

impl DocumentLoader {
    pub fn new(guard: PathGuard) -> Self {
        Self { guard }
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Load one file; `source` metadata is the resolved absolute path
    pub fn load(&self, path: &Path) -> Result<Document, DomainError> {
        let resolved = self.guard.validate(path)?;

        let file_meta = fs::metadata(&resolved).map_err(|e| DomainError::from_io(&resolved, e))?;
        if !file_meta.is_file() {
            return Err(DomainError::file(format!(
                "{} is not a regular file",
                resolved.display()
            )));
        }

        self.guard.validate_size(&resolved)?;

        let bytes = fs::read(&resolved).map_err(|e| DomainError::from_io(&resolved, e))?;
        let format = DocumentFormat::from_path(&resolved);
        let mut metadata = base_metadata(&resolved, format, &file_meta);

        let content = match format {
            DocumentFormat::Markdown => {
                markdown::load(require_utf8(&resolved, bytes)?, &mut metadata)
            }
            DocumentFormat::StructuredSource(language) => {
                let code = require_utf8(&resolved, bytes)?;

                match source_code::extract_structure(&code, language) {
                    Ok(structure) => structure.apply(&mut metadata),
                    Err(e) => warn!(
                        path = %resolved.display(),
                        error = %e,
                        "Could not extract source structure, keeping raw content"
                    ),
                }

                code
            }
            DocumentFormat::TypedSource(_) => require_utf8(&resolved, bytes)?,
            DocumentFormat::PlainText => {
                let (text, encoding) = plain_text::decode(bytes);
                metadata.insert(keys::ENCODING.to_string(), json!(encoding));
                text
            }
        };

        debug!(
            path = %resolved.display(),
            file_type = format.file_type(),
            chars = helpers::char_len(&content),
            "Loaded document"
        );

        Ok(Document::new(content).with_all_metadata(metadata))
    }
}

fn base_metadata(path: &Path, format: DocumentFormat, file_meta: &fs::Metadata) -> Metadata {
    let mut metadata = Metadata::new();

    metadata.insert(keys::SOURCE.to_string(), json!(path.to_string_lossy()));
    metadata.insert(keys::FILE_TYPE.to_string(), json!(format.file_type()));
    metadata.insert(keys::LANGUAGE.to_string(), json!(format.language()));
    metadata.insert(keys::FILE_SIZE.to_string(), json!(file_meta.len()));

    if let Ok(modified) = file_meta.modified() {
        let modified: DateTime<Utc> = modified.into();
        metadata.insert(keys::LAST_MODIFIED.to_string(), json!(modified.to_rfc3339()));
    }

    metadata
}

fn require_utf8(path: &Path, bytes: Vec<u8>) -> Result<String, DomainError> {
    String::from_utf8(bytes).map_err(|e| {
        DomainError::file(format!("{} is not valid UTF-8: {}", path.display(), e))
    })
}
