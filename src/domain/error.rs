use std::io;

use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Path error: {message}")]
    Path { message: String },

    #[error("File error: {message}")]
    File { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Initialization error: {message}")]
    Initialization { message: String },

    #[error("Not implemented: {message}")]
    NotImplemented { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn path(message: impl Into<String>) -> Self {
        Self::Path {
            message: message.into(),
        }
    }

    pub fn file(message: impl Into<String>) -> Self {
        Self::File {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
        }
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable name of the error category, used when reporting degraded results
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path { .. } => "PathError",
            Self::File { .. } => "FileError",
            Self::Validation { .. } => "ValidationError",
            Self::NotFound { .. } => "NotFound",
            Self::Initialization { .. } => "InitializationError",
            Self::NotImplemented { .. } => "NotImplemented",
            Self::Storage { .. } => "StorageError",
            Self::Provider { .. } => "ProviderError",
            Self::Internal { .. } => "InternalError",
        }
    }

    /// Wrap an io error with the path it concerns
    pub fn from_io(path: &std::path::Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => {
                Self::not_found(format!("{} does not exist", path.display()))
            }
            _ => Self::file(format!("{}: {}", path.display(), error)),
        }
    }
}

impl From<io::Error> for DomainError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::not_found(error.to_string()),
            _ => Self::file(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("notes.md does not exist");
        assert_eq!(error.to_string(), "Not found: notes.md does not exist");
        assert_eq!(error.kind(), "NotFound");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("chunk_size must be positive, got 0");
        assert_eq!(
            error.to_string(),
            "Validation error: chunk_size must be positive, got 0"
        );
        assert_eq!(error.kind(), "ValidationError");
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("openai", "HTTP 500");
        assert_eq!(error.to_string(), "Provider error: openai - HTTP 500");
        assert_eq!(error.kind(), "ProviderError");
    }

    #[test]
    fn test_io_error_mapping() {
        let missing: DomainError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(missing, DomainError::NotFound { .. }));

        let denied: DomainError =
            io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(denied, DomainError::File { .. }));
    }

    #[test]
    fn test_from_io_names_path() {
        let path = std::path::Path::new("/tmp/x.md");
        let error = DomainError::from_io(path, io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(error.to_string().contains("/tmp/x.md"));
    }
}
