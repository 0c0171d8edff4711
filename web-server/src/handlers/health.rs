//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;
use sleeprisk_core::EngineStatus;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    engine: EngineStatus,
}

/// Always 200; a missing model shows up as `degraded`
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let engine = state.classifier.status();

    Json(HealthResponse {
        status: if engine.available { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        engine,
    })
}
