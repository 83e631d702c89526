//! HTTP router construction.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::state::AppState;

/// `*` allows any origin; anything else must be a single valid origin.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    if origin == "*" {
        return Ok(CorsLayer::permissive());
    }
    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid CORS origin '{origin}': {e}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Build the application router. Unknown paths and methods fall through to a plain 404.
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api/state", get(api::get_state))
        .route("/api/control", post(api::control))
        .route("/api/analyze", post(api::analyze))
        .route("/api/metrics", get(api::metrics))
        .fallback(api::not_found)
        .method_not_allowed_fallback(api::not_found)
        .layer(cors)
        .with_state(state)
}
