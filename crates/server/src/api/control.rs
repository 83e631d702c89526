//! `POST /api/control`. Always answers `{ "ok": true }`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use winoptima_simulator::ControlCommand;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ControlResponse {
    pub ok: bool,
}

/// Takes the raw body so malformed JSON or a missing content type is a no-op
/// instead of a rejection.
pub async fn control(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ControlResponse> {
    match parse_command(&body) {
        Some(command) => {
            state.simulation.lock().await.apply(command);
        }
        None => {
            debug!(body_len = body.len(), "Ignoring unrecognized control payload");
        }
    }
    Json(ControlResponse { ok: true })
}

fn parse_command(body: &[u8]) -> Option<ControlCommand> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    let action = payload.get("action").and_then(Value::as_str);
    let mode = payload.get("mode").and_then(Value::as_str);
    ControlCommand::parse(action, mode)
}
