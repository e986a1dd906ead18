//! Ask command handler.
//!
//! One-shot question answering on stdout.

use clap::Args;
use edi_core::{AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Answer a single admissions question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output a JSON envelope instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let question = self
            .get_question()
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;
        let question = question.trim().to_string();

        if question.is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        tracing::info!("Answering question: {}", question);

        let engine = super::build_engine(config)?;
        let answer = engine.answer(&question).await?;

        if self.json {
            let output = serde_json::json!({
                "answer": answer,
                "model": config.model,
                "provider": config.provider,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // The answer already carries its trailing newline
            print!("{}", answer);
        }

        Ok(())
    }

    /// Get the question text from the positional argument or a file.
    fn get_question(&self) -> Option<String> {
        self.question.clone().or_else(|| {
            self.file.as_ref().and_then(|path| {
                std::fs::read_to_string(path)
                    .map_err(|e| tracing::error!("Failed to read question file: {}", e))
                    .ok()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_question_prefers_positional() {
        let cmd = AskCommand {
            question: Some("Is a portfolio required?".to_string()),
            file: None,
            json: false,
        };
        assert_eq!(
            cmd.get_question().as_deref(),
            Some("Is a portfolio required?")
        );
    }

    #[test]
    fn test_get_question_missing() {
        let cmd = AskCommand {
            question: None,
            file: None,
            json: false,
        };
        assert!(cmd.get_question().is_none());
    }
}
