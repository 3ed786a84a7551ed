//! Validation helpers for ingestion

use crate::domain::DomainError;

/// Reject glob patterns that could reach outside the directory being scanned
pub fn validate_glob_pattern(pattern: &str) -> Result<(), DomainError> {
    if pattern.trim().is_empty() {
        return Err(DomainError::validation("file pattern cannot be empty"));
    }

    if pattern.contains("..") || pattern.contains('/') || pattern.contains('\\') {
        return Err(DomainError::validation(format!(
            "file pattern '{}' must be a plain filename glob without path separators or '..'",
            pattern
        )));
    }

    Ok(())
}

/// Validate the optional file cap for directory ingestion
pub fn validate_max_files(max_files: Option<i64>) -> Result<Option<usize>, DomainError> {
    match max_files {
        None => Ok(None),
        Some(n) if n <= 0 => Err(DomainError::validation(format!(
            "max_files must be positive, got {}",
            n
        ))),
        Some(n) => Ok(Some(n as usize)),
    }
}

/// Validate batch size parameter
pub fn validate_batch_size(batch_size: usize) -> Result<(), DomainError> {
    if batch_size == 0 {
        return Err(DomainError::validation("batch_size must be greater than 0"));
    }

    Ok(())
}
