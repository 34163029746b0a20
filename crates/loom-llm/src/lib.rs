pub mod config;
pub mod error;
pub mod mock;
pub mod openai;
pub mod traits;
pub mod types;

pub use config::{ClientFactory, ProviderConfig};
pub use error::LlmError;
pub use mock::MockClient;
pub use openai::OpenAiClient;
pub use traits::{Completion, CompletionClient, CompletionOptions, CompletionRequest};
pub use types::{ChatTurn, Role, TokenUsage};
