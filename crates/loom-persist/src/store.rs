use async_trait::async_trait;

use crate::error::Result;
use crate::models::{GenerationMeta, MessageRole, StoredMessage, Thread};

/// Persistence seam for the chat core.
///
/// Thread and message identifiers cross this boundary as hex strings;
/// implementations parse and validate them (`StoreError::InvalidId` on
/// malformed input). Message identifiers are creation-order sortable, which
/// `list_messages` cursor pagination relies on.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Create a thread with its welcome message. The new thread starts at
    /// `messagesCount == 1`.
    async fn create_thread(&self, title: &str) -> Result<Thread>;

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    /// List threads sorted by `updatedAt` descending, `(page - 1) * limit`
    /// skipped. `total` counts all threads regardless of the page window.
    async fn list_threads(&self, page: u64, limit: i64) -> Result<ThreadPage>;

    /// Set a thread's title. Fails with `ThreadNotFound` when the thread
    /// does not exist.
    async fn rename_thread(&self, thread_id: &str, title: &str) -> Result<()>;

    /// Insert a message and update the owning thread's aggregates
    /// (`messagesCount`, `updatedAt`, `lastMessageAt`, and `title` on the
    /// thread's first user message).
    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
        meta: Option<GenerationMeta>,
    ) -> Result<StoredMessage>;

    /// List messages newest-first, strictly before `before_id` when given.
    async fn list_messages(
        &self,
        thread_id: &str,
        before_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<StoredMessage>>;

    /// Round-trip to the backing store (health checks).
    async fn ping(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ThreadPage {
    pub page: u64,
    pub limit: i64,
    pub total: u64,
    pub threads: Vec<Thread>,
}
