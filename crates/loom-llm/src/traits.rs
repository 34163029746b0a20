use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatTurn, TokenUsage};

/// Trait for a single-shot text completion against an external provider.
///
/// Implementations wrap one network call; they do not retry. Retry policy,
/// if any, belongs behind this trait — callers never retry on their own.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, request: CompletionRequest) -> Result<Completion>;
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    /// Conversation presented oldest-first. The newest user input arrives
    /// as the final turn; an optional system turn may lead the sequence.
    pub turns: Vec<ChatTurn>,
    pub options: CompletionOptions,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, turns: Vec<ChatTurn>) -> Self {
        Self {
            model: model.into(),
            turns,
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// Normalized result of a completion call.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    /// Model identifier echoed by the provider, or the requested model if
    /// the provider did not report one.
    pub model: String,
    /// Best-effort; all zeros when the provider omitted usage.
    pub usage: TokenUsage,
    /// Wall-clock duration of the provider call, measured client-side.
    pub latency_ms: u64,
}
