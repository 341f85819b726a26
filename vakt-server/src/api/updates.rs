//! Recent dataset-write log

use crate::kv::UPDATE_LOG_KEY;
use crate::state::AppState;
use crate::Result;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// GET /api/updates/recent
///
/// Most recent dataset writes, newest first. The log is peripheral:
/// store failures degrade to an empty list.
pub async fn recent_updates(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Value>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let entries = match state.kv.lrange(UPDATE_LOG_KEY, 0, limit - 1).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("update log read failed ({}); serving empty list", e);
            Vec::new()
        }
    };

    Ok(Json(entries))
}
