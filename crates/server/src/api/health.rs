//! Liveness and tick scheduler metrics.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use winoptima_core::Mode;
use winoptima_simulator::TickMetrics;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub is_running: bool,
    pub mode: Mode,
    pub ticks_executed: u64,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sim = state.simulation.lock().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        is_running: sim.is_running(),
        mode: sim.mode(),
        ticks_executed: sim.metrics().ticks_executed,
    })
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<TickMetrics> {
    let metrics = state.simulation.lock().await.metrics().clone();
    Json(metrics)
}
