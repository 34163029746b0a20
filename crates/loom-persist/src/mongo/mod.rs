pub mod repositories;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use mongodb::{bson::doc, Client, Database};

use crate::error::{Result, StoreError};
use crate::models::{derive_title, GenerationMeta, MessageRole, StoredMessage, Thread};
use crate::store::{ChatStore, ThreadPage};
use repositories::{MessageRepository, ThreadRepository};

const WELCOME_MESSAGE: &str = "Hi \u{1F44B}\nI'm your AI assistant. Ask me anything!";

pub struct MongoChatStore {
    threads: ThreadRepository,
    messages: MessageRepository,
    database: Database,
}

impl MongoChatStore {
    /// Connect to MongoDB and build the store.
    pub async fn connect(mongodb_uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let threads = ThreadRepository::new(&client, db_name);
        let messages = MessageRepository::new(&client, db_name);
        let database = client.database(db_name);

        Ok(Self {
            threads,
            messages,
            database,
        })
    }
}

fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[async_trait]
impl ChatStore for MongoChatStore {
    async fn create_thread(&self, title: &str) -> Result<Thread> {
        let thread = self.threads.create(title).await?;

        // Second write; a crash here leaves messagesCount == 1 with no
        // message (known limitation, no transaction available).
        let welcome = StoredMessage {
            id: ObjectId::new(),
            thread_id: thread.id,
            role: MessageRole::Assistant,
            content: WELCOME_MESSAGE.to_string(),
            created_at: Utc::now(),
            model: None,
            usage: None,
            latency_ms: None,
        };
        self.messages.insert(&welcome).await?;

        tracing::debug!(thread_id = %thread.id, "thread created");
        Ok(thread)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let id = parse_object_id(thread_id)?;
        self.threads.get(id).await
    }

    async fn list_threads(&self, page: u64, limit: i64) -> Result<ThreadPage> {
        let page = page.max(1);
        let skip = (page - 1) * limit.max(0) as u64;

        let threads = self.threads.list(skip, limit).await?;
        let total = self.threads.count().await?;

        Ok(ThreadPage {
            page,
            limit,
            total,
            threads,
        })
    }

    async fn rename_thread(&self, thread_id: &str, title: &str) -> Result<()> {
        let id = parse_object_id(thread_id)?;
        if !self.threads.rename(id, title).await? {
            return Err(StoreError::ThreadNotFound(thread_id.to_string()));
        }
        Ok(())
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
        meta: Option<GenerationMeta>,
    ) -> Result<StoredMessage> {
        let id = parse_object_id(thread_id)?;

        if self.threads.get(id).await?.is_none() {
            return Err(StoreError::ThreadNotFound(thread_id.to_string()));
        }

        // Count-then-branch: under concurrent posts to the same thread the
        // title may be derived from a non-first message. Accepted race.
        let first_user_message = role == MessageRole::User
            && self.messages.count_by_role(id, MessageRole::User).await? == 0;

        let message = StoredMessage {
            id: ObjectId::new(),
            thread_id: id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
            model: meta.as_ref().map(|m| m.model.clone()),
            usage: meta.as_ref().map(|m| m.usage.clone()),
            latency_ms: meta.as_ref().map(|m| m.latency_ms),
        };
        self.messages.insert(&message).await?;

        let title = first_user_message.then(|| derive_title(content));
        let matched = self.threads.record_message(id, title.as_deref()).await?;
        if !matched {
            // Thread vanished between the existence check and the aggregate
            // update; the counter is now stale for this message.
            tracing::warn!(thread_id, message_id = %message.id, "aggregate update matched no thread");
        }

        Ok(message)
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        before_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<StoredMessage>> {
        let id = parse_object_id(thread_id)?;
        let before = before_id.map(parse_object_id).transpose()?;
        self.messages.list_before(id, before, limit).await
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
