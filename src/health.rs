//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload with the build version,
//! uptime, the size of the route table and cumulative relay counters.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub git: String,
    pub uptime_seconds: u64,
    pub routes: usize,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_relayed: u64,
    pub requests_failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git: env!("PORTICO_GIT_SHORT").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        routes: state.routes.len(),
        stats: StatsResponse {
            requests_relayed: state.stats.relayed(),
            requests_failed: state.stats.failed(),
        },
    })
}
