use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::{bson::doc, Client, Collection};

use crate::error::Result;
use crate::models::{MessageRole, StoredMessage};

#[derive(Clone)]
pub struct MessageRepository {
    collection: Collection<StoredMessage>,
}

impl MessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    pub async fn insert(&self, message: &StoredMessage) -> Result<ObjectId> {
        self.collection.insert_one(message).await?;
        Ok(message.id)
    }

    /// Messages newest-first, strictly before the cursor when given.
    /// `_id` ordering doubles as creation ordering.
    pub async fn list_before(
        &self,
        thread_id: ObjectId,
        before: Option<ObjectId>,
        limit: i64,
    ) -> Result<Vec<StoredMessage>> {
        let mut filter = doc! { "threadId": thread_id };
        if let Some(before_id) = before {
            filter.insert("_id", doc! { "$lt": before_id });
        }

        let messages = self
            .collection
            .find(filter)
            .sort(doc! { "_id": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }

    pub async fn count_by_role(&self, thread_id: ObjectId, role: MessageRole) -> Result<u64> {
        let filter = doc! { "threadId": thread_id, "role": role.as_str() };
        Ok(self.collection.count_documents(filter).await?)
    }
}
