use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::agent::PlanningAgent;
use crate::error::ApiError;
use crate::models::{
    DeletePlanResponse, GeneratePlanRequest, GeneratePlanResponse, ListPlansResponse, Plan,
};
use crate::store::PlanStore;

pub async fn handle_generate(
    request: GeneratePlanRequest,
    agent: Arc<PlanningAgent>,
    store: PlanStore,
) -> Result<impl Reply, Rejection> {
    if request.goal.trim().is_empty() {
        return Err(warp::reject::custom(ApiError::BadRequest(
            "goal must not be empty".to_string(),
        )));
    }

    let request_id = Uuid::new_v4();
    info!("Generating plan [{}] for goal: {}", request_id, request.goal);

    let plan = agent.generate_plan(&request.goal).await;

    // Outright failure is reported and nothing is stored; degraded
    // raw-text plans are still best-effort successes and get saved.
    if let Plan::Failed { error } = &plan {
        warn!("Plan generation [{}] failed: {}", request_id, error);
        let body = warp::reply::json(&serde_json::json!({ "error": error }));
        return Ok(warp::reply::with_status(body, StatusCode::BAD_GATEWAY));
    }

    let id = store
        .save_plan(&request.goal, &plan)
        .await
        .map_err(warp::reject::custom)?;
    info!("Plan [{}] stored with id {}", request_id, id);

    let body = warp::reply::json(&GeneratePlanResponse {
        id,
        goal: request.goal,
        plan,
    });
    Ok(warp::reply::with_status(body, StatusCode::CREATED))
}

pub async fn handle_list(store: PlanStore) -> Result<impl Reply, Rejection> {
    let plans = store.get_all_plans().await.map_err(warp::reject::custom)?;
    info!("Listing {} stored plan(s)", plans.len());
    Ok(warp::reply::json(&ListPlansResponse { plans }))
}

pub async fn handle_delete(id: String, store: PlanStore) -> Result<impl Reply, Rejection> {
    info!("Deleting plan {}", id);
    let deleted = store.delete_plan(&id).await.map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&DeletePlanResponse { deleted }))
}
