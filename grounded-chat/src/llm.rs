//! Chat model seam used by the answer generator.

use std::{future::Future, pin::Pin};

use ai_llm_service::{AiLlmError, LlmServiceProfiles};

/// One non-streaming completion: `[system, user]` in, assistant text out.
pub trait ChatModel: Send + Sync {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;
}

/// Uses the chat profile; temperature, max tokens and timeout come from its config.
impl ChatModel for LlmServiceProfiles {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
        Box::pin(self.generate(user, Some(system)))
    }
}
