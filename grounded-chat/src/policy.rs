//! Versioned prompt policy: the rule set rendered into the system prompt and
//! the deterministic post-processing applied to every model answer.
//!
//! Sources, later wins:
//! 1. built-in defaults ([`PromptPolicy::default`])
//! 2. JSON file at `PROMPT_POLICY_PATH` (missing fields keep their defaults)
//! 3. `POLICY_REFUSAL`, `POLICY_UNKNOWN`, `POLICY_GREETINGS` (JSON array of groups)

use std::path::Path;

use ai_llm_service::error_handler::env_opt;
use ai_llm_service::{AiLlmError, ProviderErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PolicyError;

/// Policy schema version understood by this build.
pub const POLICY_VERSION: u32 = 1;

const QUOTES: &[char] = &['"', '\'', '`', '*', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];
const SENTENCE_END: &[char] = &['.', '!', '?', '।'];

/// A closed set of equivalent short messages and the reply they deserve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GreetingGroup {
    pub phrases: Vec<String>,
    pub reply: String,
}

impl GreetingGroup {
    fn new(phrases: &[&str], reply: &str) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            reply: reply.to_string(),
        }
    }
}

/// Language rule: code-switched replies only for code-switched questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageRule {
    /// Languages the assistant may answer in, e.g. `["English", "Hindi"]`.
    pub languages: Vec<String>,
    /// Name of the mixed register, e.g. `Hinglish`.
    pub mixed: String,
}

/// Fixed strings returned when generation fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fallbacks {
    /// No credential configured.
    pub missing_key: String,
    /// Upstream answered with a non-success status or without choices.
    pub upstream: String,
    /// Transport error, timeout or malformed body.
    pub generic: String,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            missing_key: "API key missing".into(),
            upstream: "Error or quota finished".into(),
            generic: "Sorry, something went wrong".into(),
        }
    }
}

impl Fallbacks {
    /// Picks the fallback string for a generation error.
    pub fn for_error(&self, err: &AiLlmError) -> &str {
        match err.provider_kind() {
            Some(ProviderErrorKind::MissingApiKey) => &self.missing_key,
            Some(
                ProviderErrorKind::HttpStatus(_)
                | ProviderErrorKind::EmptyChoices
                | ProviderErrorKind::EmptyData,
            ) => &self.upstream,
            _ => &self.generic,
        }
    }
}

/// The grounding rule set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PromptPolicy {
    pub version: u32,
    /// Opening line of the system prompt.
    pub persona: String,
    /// What counts as "related", e.g. company, profile, employees, services.
    pub scope: Vec<String>,
    /// Exact reply for unrelated questions.
    pub refusal: String,
    /// Exact reply when the context lacks the answer.
    pub unknown: String,
    pub max_sentences: usize,
    pub language: LanguageRule,
    pub greetings: Vec<GreetingGroup>,
    pub fallbacks: Fallbacks,
}

impl Default for PromptPolicy {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION,
            persona: "You are a strict company information assistant.".into(),
            scope: ["company", "profile", "employees", "services"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            refusal: "Not related to FDA".into(),
            unknown: "Not related to profile".into(),
            max_sentences: 3,
            language: LanguageRule {
                languages: vec!["English".into(), "Hindi".into()],
                mixed: "Hinglish".into(),
            },
            greetings: vec![
                GreetingGroup::new(&["thank you", "thanks", "thank u", "thx"], "You're welcome"),
                GreetingGroup::new(&["थैंक्स"], "Glad I could help"),
                GreetingGroup::new(
                    &["ok", "okay", "got it", "understood", "great", "nice", "good"],
                    "Okay",
                ),
                GreetingGroup::new(&["ओके", "अच्छा", "ठीक"], "ठीक है"),
                GreetingGroup::new(&["बढ़िया"], "बढ़िया"),
                GreetingGroup::new(&["हां", "जी"], "हां जी"),
                GreetingGroup::new(&["hello", "hlo", "hey", "hi", "sup", "yo"], "Hi! \u{1F60A}"),
                GreetingGroup::new(&["हैलो", "हेलो"], "हैलो!"),
                GreetingGroup::new(&["हाय", "है", "सुप", "यो"], "हाय"),
                GreetingGroup::new(&["नमस्ते"], "नमस्ते"),
                GreetingGroup::new(&["bye", "bie", "bye-bye", "goodbye"], "Bye! \u{1F44B}"),
            ],
            fallbacks: Fallbacks::default(),
        }
    }
}

impl PromptPolicy {
    /// Defaults, then `PROMPT_POLICY_PATH`, then per-field env overrides.
    ///
    /// # Errors
    /// Unreadable or invalid policy file, malformed `POLICY_GREETINGS`, or a
    /// policy that fails [`Self::validate`].
    pub fn from_env() -> Result<Self, PolicyError> {
        let mut policy = match env_opt("PROMPT_POLICY_PATH") {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        policy.apply_overrides(env_opt)?;
        policy.validate()?;

        info!(
            version = policy.version,
            refusal = %policy.refusal,
            unknown = %policy.unknown,
            greeting_groups = policy.greetings.len(),
            max_sentences = policy.max_sentences,
            "prompt policy loaded"
        );
        Ok(policy)
    }

    /// Reads a JSON policy file. Absent fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path)?;
        let policy: Self = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "policy file parsed");
        policy.validate()?;
        Ok(policy)
    }

    /// Applies `POLICY_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), PolicyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("POLICY_REFUSAL") {
            self.refusal = v.trim().to_string();
        }
        if let Some(v) = lookup("POLICY_UNKNOWN") {
            self.unknown = v.trim().to_string();
        }
        if let Some(v) = lookup("POLICY_GREETINGS") {
            self.greetings = serde_json::from_str(&v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.version != POLICY_VERSION {
            return Err(PolicyError::UnsupportedVersion {
                found: self.version,
                supported: POLICY_VERSION,
            });
        }
        if self.refusal.trim().is_empty() || self.unknown.trim().is_empty() {
            return Err(PolicyError::Invalid(
                "refusal and unknown phrases must be non-empty".into(),
            ));
        }
        if normalize_answer(&self.refusal) == normalize_answer(&self.unknown) {
            return Err(PolicyError::Invalid(
                "refusal and unknown phrases must differ".into(),
            ));
        }
        if self.max_sentences == 0 {
            return Err(PolicyError::Invalid("max_sentences must be >= 1".into()));
        }
        if let Some(g) = self
            .greetings
            .iter()
            .find(|g| g.reply.trim().is_empty() || g.phrases.iter().all(|p| p.trim().is_empty()))
        {
            return Err(PolicyError::Invalid(format!(
                "greeting group {:?} needs at least one phrase and a reply",
                g.phrases
            )));
        }
        Ok(())
    }

    /// Canned reply when `message` is one of the configured greetings.
    pub fn greeting_reply(&self, message: &str) -> Option<&str> {
        let key = normalize_greeting(message);
        if key.is_empty() {
            return None;
        }
        self.greetings
            .iter()
            .find(|g| g.phrases.iter().any(|p| normalize_greeting(p) == key))
            .map(|g| g.reply.as_str())
    }

    pub fn is_greeting(&self, message: &str) -> bool {
        self.greeting_reply(message).is_some()
    }

    /// Every greeting phrase, in policy order.
    pub fn greeting_phrases(&self) -> impl Iterator<Item = &str> {
        self.greetings
            .iter()
            .flat_map(|g| g.phrases.iter().map(String::as_str))
    }

    /// Post-processes a raw model answer for `message`.
    ///
    /// - near-miss refusal/unknown answers become the exact phrase
    /// - a greeting never ends in the refusal, unknown or empty answer
    /// - long answers are cut after `max_sentences` sentences
    pub fn finalize(&self, message: &str, raw: &str) -> String {
        let answer = raw.trim();
        let norm = normalize_answer(answer);

        let canonical = if norm == normalize_answer(&self.refusal) {
            Some(self.refusal.as_str())
        } else if norm == normalize_answer(&self.unknown) {
            Some(self.unknown.as_str())
        } else {
            None
        };

        if canonical.is_some() || answer.is_empty() {
            if let Some(reply) = self.greeting_reply(message) {
                debug!("greeting answered with a canned reply");
                return reply.to_string();
            }
        }

        match canonical {
            Some(phrase) => phrase.to_string(),
            None if answer.is_empty() => self.unknown.clone(),
            None => clamp_sentences(answer, self.max_sentences),
        }
    }
}

/// Tokens that end in `.` without ending a sentence.
const ABBREVIATIONS: &[&str] = &["dr", "mr", "mrs", "ms", "st", "est", "etc", "e.g", "i.e", "no"];

/// Keeps the first `max` sentences of `text`.
///
/// A sentence ends at `.`, `!`, `?` or `।` followed by whitespace and then an
/// uppercase or non-ASCII character, or by the end of the text. A `.` after
/// an initial, a one- or two-digit list marker or a known abbreviation is not
/// a boundary. When in doubt the text is kept.
pub fn clamp_sentences(text: &str, max: usize) -> String {
    let text = text.trim();
    if max == 0 {
        return text.to_string();
    }

    let mut seen = 0;
    for (i, c) in text.char_indices() {
        if !SENTENCE_END.contains(&c) {
            continue;
        }
        let end = i + c.len_utf8();
        if is_sentence_boundary(text, i, c, end) {
            seen += 1;
            if seen == max {
                return text[..end].to_string();
            }
        }
    }
    text.to_string()
}

fn is_sentence_boundary(text: &str, at: usize, term: char, end: usize) -> bool {
    let rest = &text[end..];
    if rest.is_empty() {
        return true;
    }
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    let starts_sentence = rest
        .trim_start()
        .chars()
        .next()
        .is_none_or(|n| n.is_uppercase() || !n.is_ascii());
    if !starts_sentence {
        return false;
    }
    term != '.' || !is_non_terminal_token(&text[..at])
}

/// `before` is the text up to (not including) a `.`.
fn is_non_terminal_token(before: &str) -> bool {
    let token = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric());

    let mut chars = token.chars();
    let single_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
    let list_marker = (1..=2).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_digit());
    let abbreviation = ABBREVIATIONS.contains(&token.to_lowercase().as_str());

    single_letter || list_marker || abbreviation
}

fn normalize_answer(s: &str) -> String {
    s.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c) || SENTENCE_END.contains(&c))
        .to_lowercase()
}

fn normalize_greeting(s: &str) -> String {
    s.trim_matches(|c: char| {
        c.is_whitespace() || c.is_ascii_punctuation() || SENTENCE_END.contains(&c)
    })
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}
