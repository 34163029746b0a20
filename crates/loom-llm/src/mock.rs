//! Mock completion client
//!
//! Deterministic stand-in used by `ClientFactory` when the provider is
//! `"mock"`, and by tests that must not reach the network.

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{Completion, CompletionClient, CompletionRequest};
use crate::types::{Role, TokenUsage};

#[derive(Debug, Clone, Default)]
pub struct MockClient;

impl MockClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    async fn generate(&self, request: CompletionRequest) -> Result<Completion> {
        tracing::info!("mock completion client handling request");

        let last_user = request
            .turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
            .unwrap_or("nothing");

        let content = format!("Mock reply to: {}", last_user);

        let input_tokens: u32 = request
            .turns
            .iter()
            .map(|t| t.content.len() as u32 / 4)
            .sum();
        let output_tokens = content.len() as u32 / 4;

        Ok(Completion {
            content,
            model: if request.model.is_empty() {
                "mock-model".to_string()
            } else {
                request.model
            },
            usage: TokenUsage::new(input_tokens, output_tokens),
            latency_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatTurn;

    #[tokio::test]
    async fn echoes_last_user_turn() {
        let client = MockClient::new();
        let request = CompletionRequest::new(
            "",
            vec![
                ChatTurn::user("Hello, world!"),
                ChatTurn::assistant("Hi!"),
                ChatTurn::user("What time is it?"),
            ],
        );

        let completion = client.generate(request).await.unwrap();
        assert_eq!(completion.content, "Mock reply to: What time is it?");
        assert_eq!(completion.model, "mock-model");
        assert!(completion.usage.total_tokens > 0);
    }
}
