use thiserror::Error;

use loom_llm::LlmError;
use loom_persist::StoreError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message content is required")]
    EmptyContent,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
