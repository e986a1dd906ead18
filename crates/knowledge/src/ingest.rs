//! Document ingestion: build the vector index from a docs directory.

use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use crate::types::IndexedChunk;
use edi_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use text_splitter::MarkdownSplitter;
use walkdir::WalkDir;

/// Texts embedded per provider call.
const EMBED_BATCH_SIZE: usize = 32;

/// File extensions treated as admissions documents.
const DOC_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Statistics from an index build.
#[derive(Debug, Clone)]
pub struct IngestStats {
    pub sources: u32,
    pub chunks: u32,
    pub bytes: u64,
    pub duration_secs: f64,
}

/// Build a vector index from every document under `docs_dir`.
///
/// Chunk ids are content hashes, so rebuilding over unchanged documents
/// produces an identical index.
pub async fn build_index(
    docs_dir: &Path,
    embedder: &dyn EmbeddingProvider,
    max_chunk_chars: usize,
) -> AppResult<(VectorIndex, IngestStats)> {
    if !docs_dir.is_dir() {
        return Err(AppError::Knowledge(format!(
            "Docs directory not found: {}",
            docs_dir.display()
        )));
    }

    let start = Instant::now();
    let splitter = MarkdownSplitter::new(max_chunk_chars);

    let mut sources = 0u32;
    let mut bytes = 0u64;
    let mut seen: HashSet<String> = HashSet::new();
    let mut pending: Vec<IndexedChunk> = Vec::new();

    for entry in WalkDir::new(docs_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_document(path) {
            continue;
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let source = path
            .strip_prefix(docs_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        sources += 1;
        bytes += text.len() as u64;

        for chunk_text in splitter.chunks(&text) {
            let chunk_text = chunk_text.trim();
            if chunk_text.is_empty() {
                continue;
            }

            let id = content_hash(chunk_text);
            if !seen.insert(id.clone()) {
                continue;
            }

            pending.push(IndexedChunk {
                id,
                source: source.clone(),
                text: chunk_text.to_string(),
                embedding: Vec::new(),
            });
        }

        tracing::debug!("Chunked {}", path.display());
    }

    tracing::info!(
        "Embedding {} chunks from {} documents with provider '{}'",
        pending.len(),
        sources,
        embedder.provider_name()
    );

    let mut index = VectorIndex::new(embedder.model_name(), embedder.dimensions());
    let chunk_count = pending.len() as u32;

    for batch in pending.chunks_mut(EMBED_BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != batch.len() {
            return Err(AppError::Knowledge(format!(
                "Embedder returned {} vectors for {} texts",
                embeddings.len(),
                batch.len()
            )));
        }

        for (chunk, embedding) in batch.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
            index.upsert(chunk.clone())?;
        }
    }

    let stats = IngestStats {
        sources,
        chunks: chunk_count,
        bytes,
        duration_secs: start.elapsed().as_secs_f64(),
    };

    tracing::info!(
        "Indexed {} chunks from {} documents ({} bytes) in {:.2}s",
        stats.chunks,
        stats.sources,
        stats.bytes,
        stats.duration_secs
    );

    Ok((index, stats))
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DOC_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// SHA-256 hex digest of chunk text, used as a stable chunk id.
fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;

    fn write_doc(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = content_hash("same text");
        let b = content_hash("same text");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_hash("other text"));
    }

    #[test]
    fn test_is_document_filters_extensions() {
        assert!(is_document(Path::new("admissions.md")));
        assert!(is_document(Path::new("notes.TXT")));
        assert!(!is_document(Path::new("image.png")));
        assert!(!is_document(Path::new("README")));
    }

    #[tokio::test]
    async fn test_build_index_from_docs() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "requirements.md",
            "# Requirements\n\nA portfolio is required for admission.",
        );
        write_doc(
            dir.path(),
            "visa.txt",
            "International students apply for a student pass after accepting an offer.",
        );
        write_doc(dir.path(), "ignored.png", "binary-ish");

        let embedder = TrigramProvider::new(64);
        let (index, stats) = build_index(dir.path(), &embedder, 1000).await.unwrap();

        assert_eq!(stats.sources, 2);
        assert!(stats.chunks >= 2);
        assert_eq!(index.len() as u32, stats.chunks);
        assert_eq!(index.dimensions(), 64);
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "doc.md", "Admissions are assessed holistically.");

        let embedder = TrigramProvider::new(64);
        let (first, _) = build_index(dir.path(), &embedder, 1000).await.unwrap();
        let (second, _) = build_index(dir.path(), &embedder, 1000).await.unwrap();

        assert_eq!(first.len(), second.len());
    }

    #[tokio::test]
    async fn test_missing_docs_dir_errors() {
        let embedder = TrigramProvider::new(64);
        let result = build_index(Path::new("/nonexistent/docs"), &embedder, 1000).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_chunks_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "a.md", "Identical paragraph of admissions text.");
        write_doc(dir.path(), "b.md", "Identical paragraph of admissions text.");

        let embedder = TrigramProvider::new(64);
        let (index, stats) = build_index(dir.path(), &embedder, 1000).await.unwrap();

        assert_eq!(stats.sources, 2);
        assert_eq!(index.len(), 1);
    }
}
