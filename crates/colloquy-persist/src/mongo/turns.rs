use mongodb::{Client, Collection, bson::doc};
use mongodb::bson::oid::ObjectId;
use async_trait::async_trait;
use futures::TryStreamExt;
use chrono::Utc;

use crate::models::{Turn, TurnRole};
use crate::traits::TurnStore;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoTurnStore {
    collection: Collection<Turn>,
}

impl MongoTurnStore {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("turns");
        Self { collection }
    }
}

#[async_trait]
impl TurnStore for MongoTurnStore {
    async fn append(
        &self,
        conversation_id: ObjectId,
        role: TurnRole,
        content: &str,
    ) -> Result<Turn> {
        let turn = Turn {
            id: ObjectId::new(),
            conversation_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };

        self.collection.insert_one(&turn).await?;
        Ok(turn)
    }

    async fn recent_turns(&self, conversation_id: ObjectId, limit: i64) -> Result<Vec<Turn>> {
        let filter = doc! { "conversation_id": conversation_id };
        let turns = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(turns)
    }

    async fn all_turns(&self, conversation_id: ObjectId) -> Result<Vec<Turn>> {
        let filter = doc! { "conversation_id": conversation_id };
        let turns = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(turns)
    }

    async fn delete_all(&self, conversation_id: ObjectId) -> Result<()> {
        let filter = doc! { "conversation_id": conversation_id };
        self.collection.delete_many(filter).await?;
        Ok(())
    }
}
