//! Dataset read/write handlers
//!
//! Every read and write goes through the fixed `DatasetKey` enumeration;
//! an unrecognized name is rejected before any store traffic. Reads
//! degrade to the dataset default when the store is unreachable; writes
//! surface store failures to the caller.

use crate::api::require_admin;
use crate::kv::{UPDATE_LOG_CAP, UPDATE_LOG_KEY};
use crate::state::AppState;
use crate::{Error, Result};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use vakt_common::DatasetKey;

#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub status: String,
    pub dataset: DatasetKey,
}

fn parse_key(key: &str) -> Result<DatasetKey> {
    key.parse::<DatasetKey>()
        .map_err(|_| Error::UnknownDataset(key.to_string()))
}

/// GET /api/dataset/:key
///
/// Returns the stored value, or the dataset default when unset or when
/// the store read fails (degrade, never blank).
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>> {
    let dataset = parse_key(&key)?;

    match state.kv.get(&dataset.storage_key()).await {
        Ok(Some(value)) => Ok(Json(value)),
        Ok(None) => Ok(Json(dataset.default_value())),
        Err(e) => {
            warn!("store read failed for {} ({}); serving default", dataset, e);
            Ok(Json(dataset.default_value()))
        }
    }
}

/// POST /api/dataset/:key
///
/// Wholesale replace: the stored value becomes exactly the request body
/// (last-writer-wins, no merge). On success the update log is appended
/// and a data-update event is broadcast.
pub async fn set_dataset(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<WriteResponse>> {
    let dataset = parse_key(&key)?;
    require_admin(&state, &headers)?;

    if body.is_null() {
        return Err(Error::InvalidInput(format!(
            "refusing to replace {} with null",
            dataset
        )));
    }

    state.kv.set(&dataset.storage_key(), &body).await?;
    info!("dataset {} replaced", dataset);

    record_update(&state, dataset).await;
    state.updates.notify_data_update(dataset);

    Ok(Json(WriteResponse {
        status: "ok".to_string(),
        dataset,
    }))
}

/// Append to the capped update log. Log loss is acceptable; failures
/// never fail the write that triggered them.
async fn record_update(state: &AppState, dataset: DatasetKey) {
    let entry = json!({
        "dataset": dataset,
        "timestamp": Utc::now(),
    });

    match state.kv.lpush(UPDATE_LOG_KEY, &entry).await {
        Ok(len) if len > UPDATE_LOG_CAP => {
            if let Err(e) = state.kv.rpop(UPDATE_LOG_KEY).await {
                warn!("update log trim failed: {}", e);
            }
        }
        Ok(_) => {}
        Err(e) => warn!("update log append failed: {}", e),
    }
}
