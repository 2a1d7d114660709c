use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_COMPLETED: &str = "completed";

/// Outcome of one plan-generation run.
///
/// Untagged so the wire form is the plain JSON shape each variant stands
/// for: a day-keyed object, `{"plan": ...}`, `{"plan": ..., "error": ...}`
/// or `{"error": ...}`. Variant order is load-bearing for deserialization:
/// `RawWithError` must precede `Raw` (both carry a `plan` key) and
/// `Structured` must come last because it matches any object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Plan {
    RawWithError { plan: String, error: String },
    Raw { plan: String },
    Failed { error: String },
    Structured(Map<String, Value>),
}

impl Plan {
    /// True only for the outright-failure shape; the raw variants are
    /// best-effort successes and still get persisted.
    pub fn is_failed(&self) -> bool {
        matches!(self, Plan::Failed { .. })
    }
}

/// Persisted form of a plan record, owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub goal: String,
    pub plan: Plan,
    pub timestamp: BsonDateTime,
    pub status: String,
}

/// A stored plan as exposed by the API, id normalized to its hex form.
#[derive(Debug, Clone, Serialize)]
pub struct StoredPlan {
    pub id: String,
    pub goal: String,
    pub plan: Plan,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

impl From<PlanDocument> for StoredPlan {
    fn from(document: PlanDocument) -> Self {
        StoredPlan {
            id: document.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            goal: document.goal,
            plan: document.plan,
            timestamp: document.timestamp.to_chrono(),
            status: document.status,
        }
    }
}

// API request/response models

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub id: String,
    pub goal: String,
    pub plan: Plan,
}

#[derive(Debug, Serialize)]
pub struct ListPlansResponse {
    pub plans: Vec<StoredPlan>,
}

#[derive(Debug, Serialize)]
pub struct DeletePlanResponse {
    pub deleted: u64,
}
