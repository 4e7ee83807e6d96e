//! One chat turn: validate → retrieve → generate.

use std::sync::Arc;

use rag_store::{RagHit, Retriever};
use tracing::info;

use crate::error::ChatError;
use crate::generator::AnswerGenerator;

/// Stateless per-turn pipeline; share it behind an `Arc`.
pub struct ChatPipeline {
    retriever: Arc<Retriever>,
    generator: AnswerGenerator,
}

impl ChatPipeline {
    pub fn new(retriever: Arc<Retriever>, generator: AnswerGenerator) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    /// Answers `message`.
    ///
    /// The message is trimmed first. Retrieval and generation never fail;
    /// the only error is an empty message, detected before any downstream call.
    pub async fn handle(&self, message: &str) -> Result<String, ChatError> {
        let question = message.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let hits = self.retriever.retrieve(question).await;
        let context = join_context(&hits);
        info!(
            hits = hits.len(),
            context_len = context.len(),
            "context retrieved"
        );

        Ok(self.generator.generate(&context, question).await)
    }
}

/// Hit texts in ranked order separated by a blank line; empty when no hits.
pub fn join_context(hits: &[RagHit]) -> String {
    hits.iter()
        .map(|h| h.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
