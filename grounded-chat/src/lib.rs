//! Grounded answers over a retrieved context.
//!
//! Public API: [`ChatPipeline::handle`]. It trims and validates the message,
//! retrieves the top-k chunks from `rag-store`, renders the [`PromptPolicy`]
//! into a system prompt with the chunks as context, asks the chat model once
//! and post-processes the answer (exact refusal/unknown phrases, greeting
//! replies, sentence limit). Generation failures become the policy's fixed
//! fallback strings.

pub mod error;
pub mod generator;
pub mod llm;
pub mod pipeline;
pub mod policy;
pub mod prompt;

#[cfg(test)]
mod test_support;

pub use error::{ChatError, PolicyError};
pub use generator::AnswerGenerator;
pub use llm::ChatModel;
pub use pipeline::ChatPipeline;
pub use policy::{Fallbacks, GreetingGroup, LanguageRule, PromptPolicy};
