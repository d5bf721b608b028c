//! Readiness endpoint

use axum::{Router, extract::State, routing::get};
use axum_helpers::{DependencyStatus, ReadyResponse};
use mongodb::Client;

pub fn router(client: Client) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(client)
}

/// 200 when MongoDB answers a ping, 503 otherwise
async fn readiness_check(State(client): State<Client>) -> ReadyResponse {
    let mongo = database::mongodb::check_health_detailed(&client).await;

    ReadyResponse::from_checks(vec![DependencyStatus {
        name: "mongodb",
        healthy: mongo.healthy,
        latency_ms: Some(mongo.response_time_ms),
        message: mongo.message,
    }])
}
