//! Retrieval types.

use serde::{Deserialize, Serialize};

/// A retrieved chunk of reference text paired with its relevance score.
///
/// Scores are cosine similarities; higher is more relevant. Sequences of
/// scored chunks are always ordered descending by score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The chunk text
    pub text: String,

    /// Similarity score against the question embedding
    pub score: f32,
}

/// A chunk stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Content-hash identifier (SHA-256 of the chunk text)
    pub id: String,

    /// Source document the chunk came from
    pub source: String,

    /// The chunk text
    pub text: String,

    /// Embedding vector
    pub embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scored_chunk_serialization() {
        let chunk = ScoredChunk {
            text: "admissions info".to_string(),
            score: 0.87,
        };

        let json = serde_json::to_string(&chunk).unwrap();
        let back: ScoredChunk = serde_json::from_str(&json).unwrap();

        assert_eq!(back.text, chunk.text);
        assert_eq!(back.score, chunk.score);
    }
}
