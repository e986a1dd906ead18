//! Command handlers for the EDI Assist CLI.

pub mod ask;
pub mod learn;
pub mod serve;

pub use ask::AskCommand;
pub use learn::LearnCommand;
pub use serve::ServeCommand;

use edi_core::{AppConfig, AppResult};
use edi_engine::AnswerEngine;
use edi_knowledge::KnowledgeRetriever;
use std::sync::Arc;

/// Construct the answer engine from configuration.
///
/// Collaborator handles (index, embedder, LLM client) are built once here
/// and shared by reference for the lifetime of the process.
pub(crate) fn build_engine(config: &AppConfig) -> AppResult<AnswerEngine> {
    let api_key = config.resolve_api_key();

    let embedder = edi_knowledge::create_provider(
        &config.embedding,
        config.endpoint.as_deref(),
        api_key.as_deref(),
    )?;

    let retriever = Arc::new(KnowledgeRetriever::load(&config.index_path, embedder)?);

    let llm = edi_llm::create_client(
        &config.provider,
        config.endpoint.as_deref(),
        api_key.as_deref(),
    )?;

    Ok(AnswerEngine::new(
        retriever,
        llm,
        config.model.clone(),
        config.top_k,
    ))
}
