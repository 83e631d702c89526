use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use winoptima_simulator::StateSnapshot;

use crate::state::AppState;

/// `GET /api/state`
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateSnapshot> {
    let snapshot = state.simulation.lock().await.snapshot();
    Json(snapshot)
}
