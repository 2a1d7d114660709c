use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};
use tracing::info;

use crate::error::ApiError;
use crate::models::{Plan, PlanDocument, StoredPlan, STATUS_COMPLETED};

/// Handle on the plan collection. Constructed once at startup and cloned
/// into request handlers; the underlying client pools connections.
#[derive(Clone)]
pub struct PlanStore {
    collection: Collection<PlanDocument>,
}

impl PlanStore {
    /// Connects and verifies liveness with a `ping` so an unreachable
    /// store fails startup rather than the first interaction.
    pub async fn connect(uri: &str, db_name: &str, collection_name: &str) -> anyhow::Result<Self> {
        info!("Connecting to MongoDB database '{}'", db_name);
        let client = Client::with_uri_str(uri).await?;
        client
            .database(db_name)
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        info!("MongoDB connection established");

        let collection = client.database(db_name).collection(collection_name);
        Ok(Self { collection })
    }

    /// Inserts one record with the current timestamp and returns its id
    /// in hex form. Persistence failures propagate to the caller; nothing
    /// partial is ever visible.
    pub async fn save_plan(&self, goal: &str, plan: &Plan) -> Result<String, ApiError> {
        info!("Saving plan for goal: {:.50}", goal);
        let document = PlanDocument {
            id: None,
            goal: goal.to_string(),
            plan: plan.clone(),
            timestamp: BsonDateTime::now(),
            status: STATUS_COMPLETED.to_string(),
        };

        let result = self.collection.insert_one(&document, None).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .ok_or_else(|| ApiError::Internal("inserted id was not an ObjectId".to_string()))?;
        info!("Plan saved with id {}", id);
        Ok(id)
    }

    /// All stored plans, newest first.
    pub async fn get_all_plans(&self) -> Result<Vec<StoredPlan>, ApiError> {
        let options = FindOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .build();
        let mut cursor = self.collection.find(None, options).await?;

        let mut plans = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            plans.push(StoredPlan::from(document));
        }
        Ok(plans)
    }

    /// Deletes by id, returning the deleted count. An id that was never
    /// saved yields `Ok(0)`; only a malformed id is an error.
    pub async fn delete_plan(&self, id: &str) -> Result<u64, ApiError> {
        let oid = ObjectId::parse_str(id)
            .map_err(|_| ApiError::BadRequest(format!("invalid plan id: {id}")))?;
        let result = self.collection.delete_one(doc! { "_id": oid }, None).await?;
        info!("Delete of plan {} removed {} record(s)", id, result.deleted_count);
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_uri() -> String {
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    async fn test_store() -> PlanStore {
        // Fresh collection per test run so assertions see only their own data
        let collection = format!("plans_{}", ObjectId::new().to_hex());
        PlanStore::connect(&test_uri(), "planner_orchestrator_test", &collection)
            .await
            .expect("MongoDB must be reachable for store tests")
    }

    fn sample_plan() -> Plan {
        serde_json::from_value(json!({"Day 1": ["Visit Amber Fort", "Dinner at LMB"]}))
            .expect("valid plan object")
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB instance"]
    async fn save_then_get_all_round_trips() {
        let store = test_store().await;
        let plan = sample_plan();

        let id = store.save_plan("3-day trip to Jaipur", &plan).await.unwrap();
        let plans = store.get_all_plans().await.unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, id);
        assert_eq!(plans[0].goal, "3-day trip to Jaipur");
        assert_eq!(plans[0].plan, plan);
        assert_eq!(plans[0].status, STATUS_COMPLETED);
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB instance"]
    async fn get_all_returns_newest_first() {
        let store = test_store().await;
        let plan = sample_plan();

        for goal in ["first", "second", "third"] {
            store.save_plan(goal, &plan).await.unwrap();
        }

        let plans = store.get_all_plans().await.unwrap();
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].goal, "third");
        assert_eq!(plans[2].goal, "first");
        assert!(plans.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB instance"]
    async fn delete_of_unknown_id_is_a_silent_zero() {
        let store = test_store().await;
        let deleted = store.delete_plan(&ObjectId::new().to_hex()).await.unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB instance"]
    async fn delete_removes_a_saved_plan() {
        let store = test_store().await;
        let id = store.save_plan("short trip", &sample_plan()).await.unwrap();

        assert_eq!(store.delete_plan(&id).await.unwrap(), 1);
        assert!(store.get_all_plans().await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB instance"]
    async fn malformed_id_is_a_bad_request() {
        let store = test_store().await;
        let err = store.delete_plan("not-an-object-id").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
