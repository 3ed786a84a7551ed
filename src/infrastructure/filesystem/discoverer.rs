//! Directory scanning for ingestible files

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::domain::ingestion::validate_glob_pattern;
use crate::domain::DomainError;

/// Patterns used when the caller supplies none, matched case-insensitively
pub const DEFAULT_PATTERNS: &[&str] = &[
    "*.md",
    "*.markdown",
    "*.py",
    "*.rs",
    "*.js",
    "*.jsx",
    "*.mjs",
    "*.cjs",
    "*.ts",
    "*.tsx",
    "*.mts",
    "*.cts",
    "*.txt",
];

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["target", "node_modules", "__pycache__"];

/// Finds files under a root whose names match glob patterns
#[derive(Debug, Clone, Default)]
pub struct FileDiscoverer;

impl FileDiscoverer {
    pub fn new() -> Self {
        Self
    }

    /// List matching files, sorted and without duplicates
    ///
    /// Patterns match file names only; a pattern with a path separator or
    /// `..` is rejected before the walk starts.
    pub fn discover(
        &self,
        root: &Path,
        patterns: Option<&[String]>,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, DomainError> {
        if !root.exists() {
            return Err(DomainError::not_found(format!(
                "{} does not exist",
                root.display()
            )));
        }

        if !root.is_dir() {
            return Err(DomainError::validation(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let matcher = match patterns {
            Some(p) => build_globset(p, false)?,
            None => {
                let defaults: Vec<String> = DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect();
                build_globset(&defaults, true)?
            }
        };

        let max_depth = if recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

        let mut files = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.path().is_file() {
                continue;
            }

            if matcher.is_match(entry.file_name()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        files.dedup();

        debug!(
            root = %root.display(),
            recursive = recursive,
            matched = files.len(),
            "Discovered files"
        );

        Ok(files)
    }
}

fn build_globset(patterns: &[String], case_insensitive: bool) -> Result<GlobSet, DomainError> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        validate_glob_pattern(pattern)?;

        let glob = GlobBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| {
                DomainError::validation(format!("invalid file pattern '{}': {}", pattern, e))
            })?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| DomainError::validation(format!("invalid file patterns: {}", e)))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}
