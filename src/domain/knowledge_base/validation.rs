//! Knowledge index validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// Maximum length for a Postgres identifier
pub const MAX_COLLECTION_NAME_LENGTH: usize = 63;

/// Collection names become table names, so only plain SQL identifiers pass
static COLLECTION_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

/// Validate a collection name used as the durable backend's table name
pub fn validate_collection_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::validation("collection name cannot be empty"));
    }

    if name.len() > MAX_COLLECTION_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "collection name too long: {} characters (max {})",
            name.len(),
            MAX_COLLECTION_NAME_LENGTH
        )));
    }

    if !COLLECTION_NAME_PATTERN.is_match(name) {
        return Err(DomainError::validation(format!(
            "invalid collection name '{}': use lowercase letters, digits and underscores",
            name
        )));
    }

    Ok(())
}

/// Validate a default result count
pub fn validate_top_k(top_k: usize) -> Result<(), DomainError> {
    if top_k == 0 {
        return Err(DomainError::validation("top_k must be greater than 0"));
    }

    Ok(())
}
