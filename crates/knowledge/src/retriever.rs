//! Question-time retrieval over the vector index.

use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use crate::types::ScoredChunk;
use edi_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;

/// Minimum cosine similarity for a chunk to be considered relevant.
/// Scores below this are filtered out rather than surfaced as noise.
const MIN_RELEVANCE_SCORE: f32 = 0.20;

/// Trait for retrieval backends.
///
/// An empty result means "nothing relevant", never an error: a well-formed
/// question must not fail just because the index has no match for it.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `top_k` chunks relevant to the question, ordered by
    /// descending score.
    async fn retrieve(&self, question: &str, top_k: usize) -> AppResult<Vec<ScoredChunk>>;
}

/// Retriever over the persisted vector index.
pub struct KnowledgeRetriever {
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl KnowledgeRetriever {
    /// Create a retriever from an index and an embedding provider.
    ///
    /// The provider must produce vectors of the index's dimensionality.
    pub fn new(index: VectorIndex, embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        if index.dimensions() != embedder.dimensions() {
            return Err(AppError::Config(format!(
                "Index was built with {} dimensions but embedding provider '{}' produces {}",
                index.dimensions(),
                embedder.provider_name(),
                embedder.dimensions()
            )));
        }

        Ok(Self { index, embedder })
    }

    /// Load the index from disk and wrap it in a retriever.
    pub fn load(path: &Path, embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        let index = VectorIndex::load(path)?;
        Self::new(index, embedder)
    }

    /// Number of chunks available for retrieval.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[async_trait::async_trait]
impl Retriever for KnowledgeRetriever {
    async fn retrieve(&self, question: &str, top_k: usize) -> AppResult<Vec<ScoredChunk>> {
        if self.index.is_empty() {
            tracing::debug!("index is empty, returning no chunks");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(question).await?;
        let results = self.index.search(&query_embedding, top_k)?;

        let chunks: Vec<ScoredChunk> = results
            .into_iter()
            .filter(|(_, score)| *score >= MIN_RELEVANCE_SCORE)
            .map(|(chunk, score)| ScoredChunk {
                text: chunk.text,
                score,
            })
            .collect();

        if chunks.is_empty() {
            tracing::info!(
                "No relevant chunks found (all scores below {:.2} threshold)",
                MIN_RELEVANCE_SCORE
            );
        } else {
            tracing::info!(
                "Retrieved {} relevant chunks (top score: {:.3})",
                chunks.len(),
                chunks.first().map(|c| c.score).unwrap_or(0.0)
            );
        }

        Ok(chunks)
    }
}
