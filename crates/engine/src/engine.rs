//! The answer pipeline.
//!
//! Drives a question through routing, a single retrieval, optional
//! generation, sanitization, and markdown repair. Collaborator handles are
//! constructed once at process start and shared across requests.

use crate::prompt::{build_context, build_system_prompt, build_user_prompt};
use edi_core::AppResult;
use edi_format::{normalize, sanitize};
use edi_knowledge::{Retriever, ScoredChunk};
use edi_llm::{LlmClient, LlmRequest};
use edi_routing::{route, select_fallback, RouteDecision, RouteOutcome};
use std::sync::Arc;

/// Sampling temperature for factual answering.
const GENERATION_TEMPERATURE: f32 = 0.3;

/// Token cap for generated answers.
const GENERATION_MAX_TOKENS: u32 = 1000;

/// Answer pipeline over retrieval and generation collaborators.
pub struct AnswerEngine {
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LlmClient>,
    model: String,
    top_k: usize,
}

impl AnswerEngine {
    /// Create an engine from collaborator handles.
    pub fn new(
        retriever: Arc<dyn Retriever>,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            llm,
            model: model.into(),
            top_k,
        }
    }

    /// Answer an admissions question.
    ///
    /// The result is always presentable markdown; inconclusive paths
    /// resolve to catalogue fallbacks, never to errors. Collaborator
    /// failures (network, model) propagate for the boundary to translate.
    pub async fn answer(&self, question: &str) -> AppResult<String> {
        let question = question.trim();
        let mut retrieved: Option<Vec<ScoredChunk>> = None;

        // Phase one: classify. Phase two (resolve) runs only for rules
        // that need context, after the single retrieval.
        let decision = match route(question) {
            RouteOutcome::Decided(decision) => decision,
            RouteOutcome::NeedsContext(pending) => {
                tracing::debug!(intent = pending.intent_name(), "routing requested context");
                let chunks = self.retriever.retrieve(question, self.top_k).await?;
                let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
                let decision = pending.resolve(&texts);
                retrieved = Some(chunks);
                decision
            }
        };

        let fallback = match decision {
            RouteDecision::EarlyExit(text) => {
                tracing::info!("answering with canned early exit");
                return Ok(normalize(&text));
            }
            RouteDecision::Direct(text) => {
                tracing::info!("answering directly from classification");
                return Ok(normalize(&text));
            }
            RouteDecision::Defer { fallback } => fallback,
            RouteDecision::Continue => select_fallback(question).to_string(),
        };

        // Reuse chunks the router already fetched; otherwise this is the
        // one retrieval for the question.
        let chunks = match retrieved {
            Some(chunks) => chunks,
            None => self.retriever.retrieve(question, self.top_k).await?,
        };

        // Empty retrieval is the terminal failure mode, not an error
        if chunks.is_empty() {
            tracing::info!("nothing retrieved, answering with fallback");
            return Ok(normalize(&fallback));
        }

        let context = build_context(&chunks);
        let request = LlmRequest::new(build_user_prompt(question, &context), &self.model)
            .with_system(build_system_prompt())
            .with_temperature(GENERATION_TEMPERATURE)
            .with_max_tokens(GENERATION_MAX_TOKENS);

        let response = self.llm.complete(&request).await?;
        tracing::debug!(
            tokens = response.usage.total_tokens,
            "generation completed"
        );

        let cleaned = sanitize(&response.content, &fallback);
        Ok(normalize(&cleaned))
    }
}
