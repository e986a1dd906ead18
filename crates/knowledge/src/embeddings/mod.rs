//! Embedding generation for the knowledge index.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
