//! REST + SSE surface
//!
//! Sets up the axum router for dataset access, seismic data, version
//! checks, peripheral counters, and the data-sync event stream.

pub mod counters;
pub mod datasets;
pub mod earthquakes;
pub mod health;
pub mod sse;
pub mod updates;
pub mod version;

use crate::state::AppState;
use crate::{Error, Result};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/dataset/:key", get(datasets::get_dataset))
        .route("/api/dataset/:key", post(datasets::set_dataset))
        .route("/api/earthquakes", get(earthquakes::get_live))
        .route("/api/earthquakes/history", get(earthquakes::get_history))
        .route("/api/version", get(version::get_version))
        .route("/api/version", post(version::set_version))
        .route("/api/counter/:name", get(counters::get_counter))
        .route("/api/counter/:name", post(counters::increment_counter))
        .route("/api/updates/recent", get(updates::recent_updates))
        .route("/api/data-sync", get(sse::data_sync))
        .merge(health::health_routes())
        .with_state(state)
        // Dashboard is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Reject mutating requests without the configured admin token.
///
/// When no token is configured (single-operator deployment), writes are
/// open.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get("x-admin-token")
        .and_then(|value| value.to_str().ok());

    if provided == Some(expected) {
        Ok(())
    } else {
        Err(Error::Forbidden("admin token required".to_string()))
    }
}
