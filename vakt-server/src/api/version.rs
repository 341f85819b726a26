//! Stored version document for client update banners
//!
//! Clients poll GET /api/version and compare against the version they
//! were built with; an admin publishes a new one after deploying.

use crate::api::require_admin;
use crate::kv::VERSION_KEY;
use crate::state::AppState;
use crate::{Error, Result};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct PublishVersionRequest {
    pub version: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VersionDocument {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// GET /api/version
///
/// The published version document, or `{"version": null}` when nothing
/// has been published (or the store read fails — degrade, log).
pub async fn get_version(State(state): State<AppState>) -> Result<Json<Value>> {
    match state.kv.get(VERSION_KEY).await {
        Ok(Some(value)) => Ok(Json(value)),
        Ok(None) => Ok(Json(json!({ "version": null }))),
        Err(e) => {
            warn!("store read failed for version ({}); serving default", e);
            Ok(Json(json!({ "version": null })))
        }
    }
}

/// POST /api/version (admin)
pub async fn set_version(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PublishVersionRequest>,
) -> Result<Json<VersionDocument>> {
    require_admin(&state, &headers)?;

    if request.version.trim().is_empty() {
        return Err(Error::InvalidInput("version must not be empty".to_string()));
    }

    let document = VersionDocument {
        version: request.version,
        note: request.note,
        published_at: Utc::now(),
    };

    let value = serde_json::to_value(&document)
        .map_err(|e| Error::Internal(e.to_string()))?;
    state.kv.set(VERSION_KEY, &value).await?;
    info!("published version {}", document.version);

    Ok(Json(document))
}
