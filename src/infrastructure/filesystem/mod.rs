//! Filesystem access: path containment and file discovery

mod discoverer;
mod path_guard;

pub use discoverer::{FileDiscoverer, DEFAULT_PATTERNS};
pub use path_guard::{validate_path, PathGuard, DEFAULT_MAX_FILE_SIZE};
