//! Answer generation under the prompt policy.
//!
//! [`AnswerGenerator::try_generate`] is strict; [`AnswerGenerator::generate`]
//! is total and maps every failure to the policy's fallback strings.

use std::sync::Arc;

use ai_llm_service::AiLlmError;
use tracing::{debug, error};

use crate::llm::ChatModel;
use crate::policy::PromptPolicy;
use crate::prompt::build_system_prompt;

pub struct AnswerGenerator {
    model: Arc<dyn ChatModel>,
    policy: Arc<PromptPolicy>,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn ChatModel>, policy: Arc<PromptPolicy>) -> Self {
        Self { model, policy }
    }

    /// Single completion with the rendered system prompt, then policy post-processing.
    ///
    /// # Errors
    /// Any [`AiLlmError`] from the model call.
    pub async fn try_generate(&self, context: &str, question: &str) -> Result<String, AiLlmError> {
        let system = build_system_prompt(&self.policy, context);
        debug!(
            context_len = context.len(),
            question_len = question.len(),
            "requesting completion"
        );
        let raw = self.model.complete(&system, question).await?;
        Ok(self.policy.finalize(question, &raw))
    }

    /// Never fails: errors are logged and replaced by a fixed string.
    pub async fn generate(&self, context: &str, question: &str) -> String {
        match self.try_generate(context, question).await {
            Ok(answer) => answer,
            Err(err) => {
                let fallback = self.policy.fallbacks.for_error(&err);
                error!(error = %err, fallback, "answer generation failed");
                fallback.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedChat;
    use ai_llm_service::LlmServiceProfiles;
    use ai_llm_service::LlmModelConfig;
    use ai_llm_service::error_handler::{ProviderError, ProviderErrorKind};

    fn generator(chat: Arc<ScriptedChat>) -> AnswerGenerator {
        AnswerGenerator::new(chat, Arc::new(PromptPolicy::default()))
    }

    #[tokio::test]
    async fn sends_policy_prompt_with_context_and_raw_question() {
        let chat = Arc::new(ScriptedChat::replying("Founded in 2020."));
        let answer = generator(chat.clone())
            .generate("The company was founded in 2020.", "When was it founded?")
            .await;

        assert_eq!(answer, "Founded in 2020.");
        let (system, user) = chat.last_call().unwrap();
        assert!(system.contains("Not related to FDA"));
        assert!(system.ends_with("The company was founded in 2020.\n"));
        assert_eq!(user, "When was it founded?");
    }

    #[tokio::test]
    async fn blank_model_reply_becomes_unknown_or_greeting() {
        let chat = Arc::new(ScriptedChat::replying(""));
        let g = generator(chat);
        assert_eq!(g.generate("ctx", "who is the CFO?").await, "Not related to profile");
        assert_eq!(g.generate("ctx", "thanks").await, "You're welcome");
    }

    #[tokio::test]
    async fn failures_map_to_fixed_strings() {
        let cases = [
            (ProviderErrorKind::MissingApiKey, "API key missing"),
            (ProviderErrorKind::EmptyChoices, "Error or quota finished"),
            (ProviderErrorKind::Decode("x".into()), "Sorry, something went wrong"),
        ];
        for (kind, expected) in cases {
            let chat = Arc::new(ScriptedChat::failing(move || {
                ProviderError::new(clone_kind(&kind)).into()
            }));
            let g = generator(chat.clone());
            assert_eq!(g.generate("", "q").await, expected);
            assert!(g.try_generate("", "q").await.is_err());
        }
    }

    fn clone_kind(kind: &ProviderErrorKind) -> ProviderErrorKind {
        match kind {
            ProviderErrorKind::MissingApiKey => ProviderErrorKind::MissingApiKey,
            ProviderErrorKind::EmptyChoices => ProviderErrorKind::EmptyChoices,
            ProviderErrorKind::Decode(m) => ProviderErrorKind::Decode(m.clone()),
            _ => ProviderErrorKind::EmptyData,
        }
    }

    #[tokio::test]
    async fn keyless_service_answers_api_key_missing() {
        let cfg = |model: &str| LlmModelConfig {
            model: model.into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: None,
            max_tokens: Some(400),
            temperature: Some(0.4),
            top_p: None,
            timeout_secs: Some(1),
        };
        let svc = LlmServiceProfiles::new(cfg("chat"), cfg("emb"), Some(1)).unwrap();
        let g = AnswerGenerator::new(Arc::new(svc), Arc::new(PromptPolicy::default()));
        assert_eq!(g.generate("ctx", "hello?").await, "API key missing");
    }
}
