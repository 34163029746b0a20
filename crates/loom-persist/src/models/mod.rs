mod message;
mod thread;

pub use message::{GenerationMeta, MessageRole, StoredMessage, Usage};
pub use thread::{derive_title, Thread};
