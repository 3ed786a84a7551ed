//! Containment and size checks applied before any file is read

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::DomainError;

/// Default upper bound on loadable file size (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Resolves paths and confines them to a set of allowed base directories
#[derive(Debug, Clone)]
pub struct PathGuard {
    allowed_base_dirs: Vec<PathBuf>,
    max_file_size: u64,
}

impl PathGuard {
    /// An empty `allowed_base_dirs` list leaves every path allowed
    pub fn new(allowed_base_dirs: Vec<PathBuf>, max_file_size: u64) -> Self {
        let allowed_base_dirs = allowed_base_dirs
            .into_iter()
            .map(|dir| match dir.canonicalize() {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Allowed base directory cannot be resolved");
                    dir
                }
            })
            .collect();

        Self {
            allowed_base_dirs,
            max_file_size,
        }
    }

    pub fn unrestricted() -> Self {
        Self::new(Vec::new(), DEFAULT_MAX_FILE_SIZE)
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn is_restricted(&self) -> bool {
        !self.allowed_base_dirs.is_empty()
    }

    /// Resolve `path` (symlinks and `..` included) and check it lies under an allowed directory
    pub fn validate(&self, path: &Path) -> Result<PathBuf, DomainError> {
        validate_path(path, &self.allowed_base_dirs)
    }

    /// Reject files larger than the configured maximum
    pub fn validate_size(&self, path: &Path) -> Result<u64, DomainError> {
        let size = std::fs::metadata(path)
            .map_err(|e| DomainError::from_io(path, e))?
            .len();

        if size > self.max_file_size {
            return Err(DomainError::file(format!(
                "{} is {} bytes, exceeding the {} byte limit",
                path.display(),
                size,
                self.max_file_size
            )));
        }

        Ok(size)
    }
}

impl Default for PathGuard {
    fn default() -> Self {
        Self::unrestricted()
    }
}

/// Resolve `path` and require it to sit under one of `allowed_dirs`
///
/// `allowed_dirs` are expected to be canonical already. An empty slice means
/// no restriction, but the path is still resolved.
pub fn validate_path(path: &Path, allowed_dirs: &[PathBuf]) -> Result<PathBuf, DomainError> {
    let resolved = path
        .canonicalize()
        .map_err(|e| DomainError::from_io(path, e))?;

    if allowed_dirs.is_empty() || allowed_dirs.iter().any(|base| resolved.starts_with(base)) {
        return Ok(resolved);
    }

    Err(DomainError::path(format!(
        "{} is outside the allowed directories",
        resolved.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn guard_for(dir: &Path) -> PathGuard {
        PathGuard::new(vec![dir.to_path_buf()], DEFAULT_MAX_FILE_SIZE)
    }

    #[test]
    fn test_allows_file_inside_base() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.md");
        fs::write(&file, "# A").unwrap();

        let resolved = guard_for(dir.path()).validate(&file).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, file.canonicalize().unwrap());
    }

    #[test]
    fn test_rejects_dot_dot_escape() {
        let base = TempDir::new().unwrap();
        let inner = base.path().join("inner");
        fs::create_dir(&inner).unwrap();
        fs::write(base.path().join("secret.txt"), "x").unwrap();

        let escaped = inner.join("..").join("secret.txt");
        let err = guard_for(&inner).validate(&escaped).unwrap_err();
        assert!(matches!(err, DomainError::Path { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_symlink_escape() {
        let allowed = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("passwd");
        fs::write(&target, "root").unwrap();

        let link = allowed.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = guard_for(allowed.path()).validate(&link).unwrap_err();
        assert!(matches!(err, DomainError::Path { .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = guard_for(dir.path())
            .validate(&dir.path().join("missing.md"))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn test_unrestricted_allows_anything_that_exists() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let guard = PathGuard::unrestricted();
        assert!(!guard.is_restricted());
        assert!(guard.validate(&file).is_ok());
    }

    #[test]
    fn test_validate_size() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("big.txt");
        fs::write(&file, vec![b'a'; 64]).unwrap();

        let guard = PathGuard::new(vec![], 32);
        let err = guard.validate_size(&file).unwrap_err();
        assert!(matches!(err, DomainError::File { .. }));

        let guard = PathGuard::new(vec![], 64);
        assert_eq!(guard.validate_size(&file).unwrap(), 64);
    }

    #[test]
    fn test_validate_path_free_function() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let file = other.path().join("x.md");
        fs::write(&file, "x").unwrap();

        let allowed = vec![dir.path().canonicalize().unwrap()];
        assert!(validate_path(&file, &allowed).is_err());
        assert!(validate_path(&file, &[]).is_ok());
    }
}
