use thiserror::Error;
use warp::{reject::Reject, Rejection, Reply};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Reject for ApiError {}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(api_err) = err.find::<ApiError>() {
        let (status, message) = match api_err {
            ApiError::BadRequest(_) => (warp::http::StatusCode::BAD_REQUEST, "Bad request"),
            _ => (
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ),
        };

        let json = warp::reply::json(&serde_json::json!({
            "error": message,
            "details": api_err.to_string(),
        }));

        Ok(warp::reply::with_status(json, status))
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bad_request_maps_to_400() {
        let rejection = warp::reject::custom(ApiError::BadRequest("goal must not be empty".into()));
        let reply = handle_rejection(rejection)
            .await
            .expect("ApiError rejections are always recovered");
        let response = reply.into_response();
        assert_eq!(response.status(), warp::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_error_maps_to_500() {
        let rejection = warp::reject::custom(ApiError::Internal("boom".into()));
        let reply = handle_rejection(rejection)
            .await
            .expect("ApiError rejections are always recovered");
        let response = reply.into_response();
        assert_eq!(
            response.status(),
            warp::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn unknown_rejections_pass_through() {
        let rejection = warp::reject::not_found();
        assert!(handle_rejection(rejection).await.is_err());
    }
}
