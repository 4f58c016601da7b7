//! Health check endpoint for monitoring.
//!
//! Always answers 200; a failed database check downgrades `status` to
//! `degraded` so load balancers can tell the process is up.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: DatabaseHealth,
    pub environment: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.db.health_check().await;

    Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" },
        database: DatabaseHealth { connected },
        environment: state.config.environment.as_str(),
        timestamp: Utc::now(),
    })
}
