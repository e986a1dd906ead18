//! Learn command handler.
//!
//! Builds the vector index from the admissions documents directory.

use clap::Args;
use edi_core::{AppConfig, AppResult};
use std::path::PathBuf;

/// Build the knowledge index from the admissions documents
#[derive(Args, Debug)]
pub struct LearnCommand {
    /// Documents directory (overrides configuration)
    #[arg(short, long)]
    pub docs: Option<PathBuf>,

    /// Maximum chunk size in characters
    #[arg(long, default_value = "1000")]
    pub chunk_size: usize,
}

impl LearnCommand {
    /// Execute the learn command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let docs_dir = self.docs.as_ref().unwrap_or(&config.docs_dir);

        tracing::info!("Learning from {}", docs_dir.display());

        let api_key = config.resolve_api_key();
        let embedder = edi_knowledge::create_provider(
            &config.embedding,
            config.endpoint.as_deref(),
            api_key.as_deref(),
        )?;

        let (index, stats) =
            edi_knowledge::build_index(docs_dir, embedder.as_ref(), self.chunk_size).await?;
        index.save(&config.index_path)?;

        println!(
            "Indexed {} chunks from {} documents ({} bytes) in {:.2}s",
            stats.chunks, stats.sources, stats.bytes, stats.duration_secs
        );
        println!("Index written to {}", config.index_path.display());

        Ok(())
    }
}
