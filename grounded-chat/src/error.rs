//! Typed errors for the grounded-chat crate.

use thiserror::Error;

/// Errors surfaced by [`crate::ChatPipeline::handle`].
#[derive(Debug, Error)]
pub enum ChatError {
    /// The message was empty or whitespace-only; nothing downstream was called.
    #[error("[Grounded Chat] message cannot be empty")]
    EmptyMessage,
}

/// Errors while loading or validating a [`crate::PromptPolicy`].
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("[Grounded Chat] cannot read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("[Grounded Chat] invalid policy JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("[Grounded Chat] unsupported policy version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("[Grounded Chat] invalid policy: {0}")]
    Invalid(String),
}
