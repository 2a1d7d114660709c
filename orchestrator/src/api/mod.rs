use std::sync::Arc;

use warp::{Filter, Rejection, Reply};

use crate::agent::PlanningAgent;
use crate::store::PlanStore;

mod plans;

pub fn routes(
    store: PlanStore,
    agent: Arc<PlanningAgent>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let api = warp::path("api").and(warp::path("v1"));

    let generate_route = api
        .and(warp::path("plans"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_agent(agent))
        .and(with_store(store.clone()))
        .and_then(plans::handle_generate);

    let list_route = api
        .and(warp::path("plans"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(plans::handle_list);

    let delete_route = api
        .and(warp::path("plans"))
        .and(warp::path::param())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_store(store))
        .and_then(plans::handle_delete);

    generate_route.or(list_route).or(delete_route)
}

fn with_store(
    store: PlanStore,
) -> impl Filter<Extract = (PlanStore,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_agent(
    agent: Arc<PlanningAgent>,
) -> impl Filter<Extract = (Arc<PlanningAgent>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || agent.clone())
}
