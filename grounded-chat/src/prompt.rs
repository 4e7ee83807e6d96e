//! System prompt rendering: policy rules followed by the retrieved context.

use crate::policy::PromptPolicy;

/// Header line that precedes the context block.
pub const CONTEXT_HEADER: &str = "Context (this is the ONLY information you can use):";

/// Renders the grounding rules of `policy` and appends `context` verbatim.
///
/// `context` may be empty; the header is still emitted so the model sees
/// that nothing was retrieved.
///
/// # Example
/// ```
/// use grounded_chat::{PromptPolicy, prompt::build_system_prompt};
///
/// let p = build_system_prompt(&PromptPolicy::default(), "Founded in 2020.");
/// assert!(p.contains("\"Not related to FDA\""));
/// assert!(p.ends_with("Founded in 2020.\n"));
/// ```
pub fn build_system_prompt(policy: &PromptPolicy, context: &str) -> String {
    let scope = policy.scope.join(", ");
    let langs = &policy.language.languages;
    let greetings = policy.greeting_phrases().collect::<Vec<_>>().join(", ");

    let mut replies: Vec<&str> = Vec::new();
    for g in &policy.greetings {
        if !replies.contains(&g.reply.as_str()) {
            replies.push(&g.reply);
        }
    }

    let mut out = String::new();
    out.push_str(&policy.persona);
    out.push_str(" You MUST follow these rules EXACTLY, no exceptions:\n\n");

    out.push_str(
        "1. ONLY use information from the provided Context below. Do NOT use your own knowledge, \
         do NOT guess, do NOT add extra information.\n",
    );
    out.push_str(&format!(
        "2. If the question has NOTHING to do with the {scope}, or ANY data in the Context \
         → reply EXACTLY with this sentence and nothing else: \"{}\"\n",
        policy.refusal
    ));
    out.push_str(
        "3. If the question is even slightly related or can be answered using the Context \
         → give a short, direct answer using ONLY the Context.\n",
    );
    out.push_str(&format!(
        "4. Mixing {} is allowed ONLY if the user's question uses {}. \
         Otherwise use simple {} based on the question.\n",
        langs.join(" and "),
        policy.language.mixed,
        langs.join(" or "),
    ));
    out.push_str(&format!(
        "5. Answers must be very short: 1-{} sentences maximum.\n",
        policy.max_sentences
    ));
    out.push_str(&format!(
        "6. NEVER make up facts. If unsure or info missing → say \"{}\"\n",
        policy.unknown
    ));
    out.push_str(&format!(
        "7. If the user message is a short polite follow-up, acknowledgement, greeting or casual opener \
         (examples: {greetings}) → reply very briefly and politely in the same language/style, examples:\n"
    ));
    for r in &replies {
        out.push_str(&format!("   - \"{r}\"\n"));
    }
    out.push_str(&format!(
        "   → Do NOT say \"{}\" for these short polite/greeting messages.\n\n",
        policy.refusal
    ));

    out.push_str(CONTEXT_HEADER);
    out.push('\n');
    out.push_str(context);
    out.push('\n');
    out
}
