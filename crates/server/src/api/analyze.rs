use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use winoptima_simulator::{analyze as render_analysis, clock_label};

use crate::state::AppState;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// `POST /api/analyze`. The registry is copied under the lock and analyzed after it is released.
pub async fn analyze(State(state): State<Arc<AppState>>) -> Json<AnalyzeResponse> {
    let workloads = state.simulation.lock().await.workloads_snapshot();
    Json(AnalyzeResponse {
        analysis: render_analysis(&workloads, &clock_label()),
    })
}
