use mongodb::{Client, Collection, bson::doc};
use mongodb::bson::oid::ObjectId;
use async_trait::async_trait;
use futures::TryStreamExt;
use chrono::Utc;

use crate::models::Conversation;
use crate::traits::ConversationStore;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoConversationStore {
    collection: Collection<Conversation>,
}

impl MongoConversationStore {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("conversations");
        Self { collection }
    }
}

#[async_trait]
impl ConversationStore for MongoConversationStore {
    async fn create(&self, title: &str) -> Result<Conversation> {
        let now = Utc::now();
        let conversation = Conversation {
            id: ObjectId::new(),
            title: title.to_string(),
            summary: None,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&conversation).await?;
        Ok(conversation)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Conversation>> {
        let filter = doc! { "_id": id };
        Ok(self.collection.find_one(filter).await?)
    }

    async fn list_all(&self) -> Result<Vec<Conversation>> {
        let conversations = self
            .collection
            .find(doc! {})
            .sort(doc! { "updated_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(conversations)
    }

    async fn update_summary(&self, id: ObjectId, summary: &str) -> Result<()> {
        let filter = doc! { "_id": id };
        let update = doc! {
            "$set": {
                "summary": summary,
                "updated_at": bson::to_bson(&Utc::now())?,
            }
        };

        self.collection.update_one(filter, update).await?;
        Ok(())
    }

    async fn touch(&self, id: ObjectId) -> Result<()> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": { "updated_at": bson::to_bson(&Utc::now())? } };
        self.collection.update_one(filter, update).await?;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<()> {
        let filter = doc! { "_id": id };
        self.collection.delete_one(filter).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        // find_one fetches at most one document
        self.collection.find_one(doc! {}).await?;
        Ok(())
    }
}
