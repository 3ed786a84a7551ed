//! Document ingestion infrastructure
//!
//! Loaders turn files into documents, chunkers split them, and the
//! coordinator drives both over single files or whole directories.

pub mod chunkers;
pub mod coordinator;
pub mod factory;
pub mod loaders;

pub use chunkers::{FixedSizeChunker, RecursiveChunker};
pub use coordinator::IngestionCoordinator;
pub use factory::{chunk_text, get_splitter, ChunkerFactory, TextSplitter};
pub use loaders::DocumentLoader;
