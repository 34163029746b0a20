pub mod error;
pub mod history;
pub mod service;

pub use error::ChatError;
pub use history::{approx_tokens, build_history};
pub use service::{AssistantReply, ChatConfig, ChatService, TurnOutcome};
