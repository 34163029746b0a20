// OpenAI-specific client implementation (HTTP direct, no SDK)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{LlmError, Result};
use crate::traits::{Completion, CompletionClient, CompletionRequest};
use crate::types::TokenUsage;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| LlmError::Config("invalid API key format".to_string()))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(LlmError::Http)?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Override the API base URL (proxies, compatible providers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn generate(&self, request: CompletionRequest) -> Result<Completion> {
        let payload = build_chat_payload(&request);
        let url = format!("{}/chat/completions", self.base_url);

        let started = Instant::now();
        let response = self.http_client.post(&url).json(&payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: extract_api_error(&body),
            });
        }

        let body: WireChatResponse = response.json().await?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("response contained no choices".to_string()))?;

        let usage = body
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        let model = if body.model.is_empty() {
            request.model
        } else {
            body.model
        };

        tracing::debug!(
            model = %model,
            latency_ms,
            total_tokens = usage.total_tokens,
            "completion finished"
        );

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model,
            usage,
            latency_ms,
        })
    }
}

fn build_chat_payload(request: &CompletionRequest) -> WireChatRequest<'_> {
    let messages = request
        .turns
        .iter()
        .map(|turn| WireMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        })
        .collect();

    WireChatRequest {
        model: &request.model,
        messages,
        temperature: request.options.temperature,
        max_tokens: request.options.max_tokens,
    }
}

/// Pull the human-readable message out of an OpenAI error body, falling
/// back to the raw text when the body is not the expected shape.
fn extract_api_error(body: &str) -> String {
    #[derive(Deserialize)]
    struct WireError {
        error: WireErrorDetail,
    }
    #[derive(Deserialize)]
    struct WireErrorDetail {
        message: String,
    }

    match serde_json::from_str::<WireError>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.chars().take(200).collect(),
    }
}

#[derive(Debug, Serialize)]
struct WireChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireChatResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct WireChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CompletionOptions;
    use crate::types::ChatTurn;

    #[test]
    fn payload_carries_turns_in_order() {
        let request = CompletionRequest::new(
            "gpt-4o-mini",
            vec![
                ChatTurn::system("You are helpful"),
                ChatTurn::user("Hello"),
            ],
        );

        let payload = build_chat_payload(&request);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Hello");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn payload_includes_options_when_set() {
        let request = CompletionRequest::new("gpt-4o-mini", vec![ChatTurn::user("Hi")])
            .with_options(CompletionOptions::new().temperature(0.5).max_tokens(512));

        let json = serde_json::to_value(build_chat_payload(&request)).unwrap();
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["max_tokens"], 512);
    }

    #[test]
    fn api_error_extraction_prefers_structured_message() {
        let body = r#"{"error":{"message":"rate limited","type":"rate_limit_error"}}"#;
        assert_eq!(extract_api_error(body), "rate limited");
        assert_eq!(extract_api_error("plain text"), "plain text");
    }
}
