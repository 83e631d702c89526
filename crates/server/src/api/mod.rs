//! HTTP handlers, one module per concern.
//!
//! Handlers copy what they need out of the simulation lock and serialize
//! after releasing it.

mod analyze;
mod control;
mod health;
mod simulation;

use axum::http::StatusCode;

pub use analyze::{analyze, AnalyzeResponse};
pub use control::{control, ControlResponse};
pub use health::{health, metrics, HealthResponse};
pub use simulation::get_state;

/// Plain-text 404 for unknown paths and unsupported methods.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
