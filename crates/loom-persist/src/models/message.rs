use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use loom_llm::{ChatTurn, Role, TokenUsage};

/// One persisted conversation turn. Never mutated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub thread_id: ObjectId,
    pub role: MessageRole,
    pub content: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    // Generation metadata, present on assistant messages only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl StoredMessage {
    /// View this message as a model-input turn.
    pub fn as_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role.into(),
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl From<MessageRole> for Role {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Role::User,
            MessageRole::Assistant => Role::Assistant,
            MessageRole::System => Role::System,
        }
    }
}

/// Token accounting persisted alongside an assistant message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl From<TokenUsage> for Usage {
    fn from(usage: TokenUsage) -> Self {
        Self {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

/// Metadata attached to an assistant message at creation time.
#[derive(Debug, Clone)]
pub struct GenerationMeta {
    pub model: String,
    pub usage: Usage,
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn usage_serializes_camel_case() {
        let usage = Usage {
            input_tokens: 12,
            output_tokens: 3,
            total_tokens: 15,
        };
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["inputTokens"], 12);
        assert_eq!(json["totalTokens"], 15);
    }

    #[test]
    fn message_converts_to_turn() {
        let message = StoredMessage {
            id: ObjectId::new(),
            thread_id: ObjectId::new(),
            role: MessageRole::Assistant,
            content: "Hi".to_string(),
            created_at: Utc::now(),
            model: None,
            usage: None,
            latency_ms: None,
        };
        let turn = message.as_turn();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "Hi");
    }
}
