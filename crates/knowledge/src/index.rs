//! In-memory cosine-similarity vector index with JSON persistence.
//!
//! The whole index is loaded into memory at startup and treated as
//! immutable while serving; writes only happen during `learn`.

use crate::types::IndexedChunk;
use chrono::{DateTime, Utc};
use edi_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Vector index over knowledge chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Embedding model the vectors were produced with
    model: String,

    /// Embedding dimensions
    dimensions: usize,

    /// When the index was built
    created_at: DateTime<Utc>,

    /// Indexed chunks
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Create an empty index for the given embedding model.
    pub fn new(model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model: model.into(),
            dimensions,
            created_at: Utc::now(),
            chunks: Vec::new(),
        }
    }

    /// Embedding model name recorded at build time.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embedding dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Insert a chunk, replacing any existing chunk with the same id.
    pub fn upsert(&mut self, chunk: IndexedChunk) -> AppResult<()> {
        if chunk.embedding.len() != self.dimensions {
            return Err(AppError::Knowledge(format!(
                "Chunk embedding has {} dimensions, index expects {}",
                chunk.embedding.len(),
                self.dimensions
            )));
        }

        if let Some(existing) = self.chunks.iter_mut().find(|c| c.id == chunk.id) {
            *existing = chunk;
        } else {
            self.chunks.push(chunk);
        }

        Ok(())
    }

    /// Search for the top-k most similar chunks to the query embedding.
    ///
    /// Returns chunks ordered by descending cosine similarity.
    pub fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<(IndexedChunk, f32)>> {
        if query.len() != self.dimensions {
            return Err(AppError::Knowledge(format!(
                "Query embedding has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(IndexedChunk, f32)> = self
            .chunks
            .iter()
            .map(|chunk| (chunk.clone(), cosine_similarity(query, &chunk.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        Ok(scored)
    }

    /// Persist the index as JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;

        tracing::info!(
            "Saved index with {} chunks to {}",
            self.chunks.len(),
            path.display()
        );
        Ok(())
    }

    /// Load a previously saved index.
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read index {}: {}", path.display(), e))
        })?;

        let index: VectorIndex = serde_json::from_str(&contents)?;

        tracing::info!(
            "Loaded index with {} chunks (model: {}, {} dims)",
            index.chunks.len(),
            index.model,
            index.dimensions
        );
        Ok(index)
    }
}

/// Cosine similarity between two vectors of equal length.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, embedding: Vec<f32>) -> IndexedChunk {
        IndexedChunk {
            id: id.to_string(),
            source: "test.md".to_string(),
            text: format!("chunk {}", id),
            embedding,
        }
    }

    #[test]
    fn test_search_orders_descending_and_truncates() {
        let mut index = VectorIndex::new("trigram-v1", 2);
        index.upsert(chunk("a", vec![1.0, 0.0])).unwrap();
        index.upsert(chunk("b", vec![0.0, 1.0])).unwrap();
        index.upsert(chunk("c", vec![0.7, 0.7])).unwrap();

        let results = index.search(&[1.0, 0.0], 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.id, "a");
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut index = VectorIndex::new("trigram-v1", 2);
        index.upsert(chunk("a", vec![1.0, 0.0])).unwrap();

        let mut replacement = chunk("a", vec![0.0, 1.0]);
        replacement.text = "updated".to_string();
        index.upsert(replacement).unwrap();

        assert_eq!(index.len(), 1);
        let results = index.search(&[0.0, 1.0], 1).unwrap();
        assert_eq!(results[0].0.text, "updated");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut index = VectorIndex::new("trigram-v1", 2);
        assert!(index.upsert(chunk("a", vec![1.0, 0.0, 0.0])).is_err());
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/index.json");

        let mut index = VectorIndex::new("trigram-v1", 2);
        index.upsert(chunk("a", vec![1.0, 0.0])).unwrap();
        index.save(&path).unwrap();

        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.model(), "trigram-v1");
        assert_eq!(loaded.dimensions(), 2);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VectorIndex::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_search_empty_index_returns_empty() {
        let index = VectorIndex::new("trigram-v1", 2);
        let results = index.search(&[1.0, 0.0], 5).unwrap();
        assert!(results.is_empty());
    }
}
