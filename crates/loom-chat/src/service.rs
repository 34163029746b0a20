use std::sync::Arc;

use serde::Serialize;

use loom_llm::{ChatTurn, CompletionClient, CompletionOptions, CompletionRequest};
use loom_persist::{ChatStore, GenerationMeta, MessageRole, Usage};

use crate::error::{ChatError, Result};
use crate::history::build_history;

/// Upper bound on messages fetched for history assembly; the token budget
/// usually cuts the window well below this.
const HISTORY_FETCH_LIMIT: i64 = 200;

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub model: String,
    pub history_n_latest: usize,
    pub history_max_tokens: usize,
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub max_response_tokens: Option<u32>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            history_n_latest: 30,
            history_max_tokens: 2000,
            system_prompt: None,
            temperature: None,
            max_response_tokens: None,
        }
    }
}

/// Orchestrates one message turn: persist the user message, rebuild the
/// bounded history, obtain a completion, persist the assistant message.
///
/// Dependencies are injected once at construction; the service holds no
/// other state and is shared behind an `Arc` across request tasks.
pub struct ChatService {
    store: Arc<dyn ChatStore>,
    client: Arc<dyn CompletionClient>,
    config: ChatConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub thread_id: String,
    pub user_message_id: String,
    pub assistant_message_id: String,
    pub assistant: AssistantReply,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn ChatStore>,
        client: Arc<dyn CompletionClient>,
        config: ChatConfig,
    ) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    /// Run one turn against `thread_id`.
    ///
    /// Side effects are strictly ordered: user write, history read,
    /// generation, assistant write. A completion failure leaves the user
    /// message persisted and surfaces as `ChatError::Completion`; nothing
    /// is rolled back and nothing is retried here.
    pub async fn post_message(&self, thread_id: &str, content: &str) -> Result<TurnOutcome> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::EmptyContent);
        }

        let user_message = self
            .store
            .create_message(thread_id, MessageRole::User, content, None)
            .await?;

        // Newest-first from the store; history assembly wants oldest-first.
        // The window read happens after the user write, so it ends with the
        // turn we just persisted.
        let mut recent = self
            .store
            .list_messages(thread_id, None, HISTORY_FETCH_LIMIT)
            .await?;
        recent.reverse();

        let mut turns: Vec<ChatTurn> = Vec::new();
        if let Some(prompt) = &self.config.system_prompt {
            turns.push(ChatTurn::system(prompt.clone()));
        }
        turns.extend(build_history(
            &recent,
            self.config.history_n_latest,
            self.config.history_max_tokens,
        ));

        let mut options = CompletionOptions::new();
        if let Some(temperature) = self.config.temperature {
            options = options.temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_response_tokens {
            options = options.max_tokens(max_tokens);
        }
        let request = CompletionRequest::new(self.config.model.clone(), turns).with_options(options);

        let completion = self.client.generate(request).await?;

        let meta = GenerationMeta {
            model: completion.model.clone(),
            usage: completion.usage.clone().into(),
            latency_ms: completion.latency_ms,
        };
        let assistant_message = self
            .store
            .create_message(
                thread_id,
                MessageRole::Assistant,
                &completion.content,
                Some(meta),
            )
            .await?;

        tracing::info!(
            thread_id,
            user_message_id = %user_message.id,
            assistant_message_id = %assistant_message.id,
            latency_ms = completion.latency_ms,
            "turn completed"
        );

        Ok(TurnOutcome {
            thread_id: thread_id.to_string(),
            user_message_id: user_message.id.to_hex(),
            assistant_message_id: assistant_message.id.to_hex(),
            assistant: AssistantReply {
                content: completion.content,
                model: completion.model,
                usage: completion.usage.into(),
            },
        })
    }
}
