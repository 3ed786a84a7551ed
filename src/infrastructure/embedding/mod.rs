//! Embedding provider implementations

mod http_client;
mod openai;

pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::{model_dimensions, OpenAiEmbeddingProvider};

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
