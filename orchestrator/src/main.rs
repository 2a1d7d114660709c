use std::sync::Arc;

use tracing::info;
use warp::Filter;

mod agent;
mod api;
mod config;
mod error;
mod middleware;
mod models;
mod store;
mod tools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting AI Task Planning Orchestrator");

    // Load configuration; missing persistence settings abort startup
    let config = config::Config::from_env()?;
    info!("Configuration loaded");

    // Connect to the plan store and verify liveness
    let store = store::PlanStore::connect(
        &config.mongodb_uri,
        &config.mongodb_db,
        &config.mongodb_collection,
    )
    .await?;

    // Build the planning agent with its two fixed tools
    let search = tools::SearchTool::new(
        config.serpapi_key.clone(),
        config.google_api_key.clone(),
        config.google_cse_id.clone(),
    )?;
    let weather = tools::WeatherTool::new(config.openweather_api_key.clone())?;
    let model = Arc::new(agent::OpenAiChat::new(config.openai_api_key.clone())?);
    let agent = Arc::new(agent::PlanningAgent::new(model, search, weather));
    info!("Planning agent initialized");

    // Build API routes
    let api_routes = api::routes(store, agent)
        .with(warp::log("api"))
        .with(middleware::cors());

    // Health check route
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    let routes = health.or(api_routes).recover(error::handle_rejection);

    // Start server
    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", addr.1);

    warp::serve(routes).run(addr).await;

    Ok(())
}
