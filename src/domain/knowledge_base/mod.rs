//! Knowledge index domain - vector storage and retrieval

mod provider;
mod query;
mod validation;

pub use provider::{
    IndexCapabilities, IndexInitializer, SourceDeletion, SourceInfo, SourceListing, VectorIndex,
};
pub use query::{
    enhance_query, format_results, query_preview, QueryOutcome, DISABLED_MESSAGE,
    NO_RESULTS_MESSAGE, QUERY_PREVIEW_CHARS, UNAVAILABLE_MESSAGE,
};
pub use validation::{validate_collection_name, validate_top_k, MAX_COLLECTION_NAME_LENGTH};

#[cfg(test)]
pub use provider::mock::{MockVectorIndex, SlowIndexInitializer};
#[cfg(test)]
pub use provider::MockIndexInitializer;
