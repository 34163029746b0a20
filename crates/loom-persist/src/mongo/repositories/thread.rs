use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::{bson::doc, Client, Collection};

use crate::error::Result;
use crate::models::Thread;

#[derive(Clone)]
pub struct ThreadRepository {
    collection: Collection<Thread>,
}

impl ThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("threads");
        Self { collection }
    }

    /// Insert a new thread. `messagesCount` starts at 1 because the caller
    /// inserts a welcome message right after.
    pub async fn create(&self, title: &str) -> Result<Thread> {
        let now = Utc::now();
        let thread = Thread {
            id: ObjectId::new(),
            title: title.to_string(),
            tags: Vec::new(),
            archived: false,
            created_at: now,
            updated_at: now,
            last_message_at: now,
            messages_count: 1,
        };

        self.collection.insert_one(&thread).await?;
        Ok(thread)
    }

    pub async fn get(&self, thread_id: ObjectId) -> Result<Option<Thread>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Page of threads, most recently active first.
    pub async fn list(&self, skip: u64, limit: i64) -> Result<Vec<Thread>> {
        let threads = self
            .collection
            .find(doc! {})
            .sort(doc! { "updatedAt": -1 })
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    /// Set the title. Returns whether a thread matched.
    pub async fn rename(&self, thread_id: ObjectId, title: &str) -> Result<bool> {
        let filter = doc! { "_id": thread_id };
        let update = doc! {
            "$set": { "title": title, "updatedAt": bson::DateTime::now() }
        };
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    /// Apply the aggregate effects of one message insert in a single atomic
    /// update: increment `messagesCount`, bump the activity timestamps, and
    /// optionally set the title (first user message). Returns whether a
    /// thread matched.
    pub async fn record_message(&self, thread_id: ObjectId, title: Option<&str>) -> Result<bool> {
        let now = bson::DateTime::now();
        let mut set = doc! { "updatedAt": now, "lastMessageAt": now };
        if let Some(title) = title {
            set.insert("title", title);
        }

        let filter = doc! { "_id": thread_id };
        let update = doc! { "$inc": { "messagesCount": 1 }, "$set": set };
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }
}
