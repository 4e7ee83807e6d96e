//! Scripted chat model and counting embedder for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::{future::Future, pin::Pin};

use ai_llm_service::AiLlmError;
use rag_store::{EmbeddingsProvider, RagError};

use crate::llm::ChatModel;

type Script = Box<dyn Fn(&str, &str) -> Result<String, AiLlmError> + Send + Sync>;

/// Chat model driven by a closure over `(system, user)`; records every call.
pub struct ScriptedChat {
    script: Script,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedChat {
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, AiLlmError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(f),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with(move |_, _| Ok(text.clone()))
    }

    pub fn failing<F>(f: F) -> Self
    where
        F: Fn() -> AiLlmError + Send + Sync + 'static,
    {
        Self::with(move |_, _| Err(f()))
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(String, String)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl ChatModel for ScriptedChat {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        let out = (self.script)(system, user);
        Box::pin(async move { out })
    }
}

/// One axis per keyword (case-insensitive substring match); counts calls.
pub struct CountingEmbedder {
    keywords: Vec<String>,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn dim(&self) -> usize {
        self.keywords.len()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingsProvider for CountingEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        let v = self
            .keywords
            .iter()
            .map(|k| if lower.contains(k.as_str()) { 1.0 } else { 0.0 })
            .collect();
        Box::pin(async move { Ok(v) })
    }
}
