//! Retrieval collaborator for EDI Assist.
//!
//! Turns a directory of admissions documents into a persisted vector index
//! and serves scored chunks for questions:
//! - `embeddings`: provider abstraction (trigram, Ollama, OpenAI)
//! - `index`: in-memory cosine index with JSON persistence
//! - `ingest`: docs directory → chunks → embeddings → index
//! - `retriever`: the `Retriever` trait consumed by the answer pipeline

pub mod embeddings;
pub mod index;
pub mod ingest;
pub mod retriever;
pub mod types;

// Re-export commonly used types
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::VectorIndex;
pub use ingest::{build_index, IngestStats};
pub use retriever::{KnowledgeRetriever, Retriever};
pub use types::{IndexedChunk, ScoredChunk};
