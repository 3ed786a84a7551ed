//! Vector index backends and the facade in front of them

mod facade;
mod factory;
mod local_file;
mod pgvector;

pub use facade::VectorIndexFacade;
pub use factory::{BackendInitializer, BackendSettings};
pub use local_file::{LocalFileIndex, INDEX_FILE_NAME, PLACEHOLDER_CONTENT, PLACEHOLDER_SOURCE};
pub use pgvector::{DistanceMetric, PgvectorConfig, PgvectorIndex};
