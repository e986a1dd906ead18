//! Generation prompt construction.

use edi_knowledge::ScoredChunk;

/// Build the context block from retrieved chunks.
pub fn build_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[Document {}]\n{}", i + 1, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// System prompt for context-only answering.
///
/// The "answer is not in the provided documents" admission is load-bearing:
/// the sanitizer strips it as a leak phrase and the degenerate-content
/// guard then swaps in the routing fallback.
pub fn build_system_prompt() -> String {
    String::from(
        "You are an admissions assistant for the MSc Engineering Design & Innovation (EDI) \
         programme.\n\n\
         Instructions:\n\
         - Use ONLY the context below to answer the question\n\
         - If the answer is not in the context, say \"The answer is not in the provided \
         documents.\"\n\
         - Do not mention technical terms like \"chunks\", \"context\", \"Document 1\", or \
         \"Document 2\"\n\
         - Answer as if you had read the admissions material directly\n\
         - Keep your response concise and factual\n",
    )
}

/// User prompt combining the question with the retrieved context.
pub fn build_user_prompt(question: &str, context: &str) -> String {
    format!(
        "Question:\n{}\n\nContext from the admissions material:\n{}",
        question, context
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> ScoredChunk {
        ScoredChunk {
            text: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_build_context_numbers_documents() {
        let context = build_context(&[chunk("First chunk"), chunk("Second chunk")]);

        assert!(context.contains("[Document 1]\nFirst chunk"));
        assert!(context.contains("[Document 2]\nSecond chunk"));
        assert!(context.contains("---"));
    }

    #[test]
    fn test_system_prompt_contains_refusal_phrase() {
        let prompt = build_system_prompt();
        assert!(prompt.contains("not in the provided documents"));
        assert!(prompt.contains("ONLY the context"));
    }

    #[test]
    fn test_user_prompt_contains_question_and_context() {
        let prompt = build_user_prompt("Is a portfolio required?", "[Document 1]\nSome text");
        assert!(prompt.contains("Is a portfolio required?"));
        assert!(prompt.contains("[Document 1]"));
    }
}
