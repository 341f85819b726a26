//! Seismic data handlers

use crate::fetch::history::HistoryBatch;
use crate::fetch::seismic::DEFAULT_WINDOW_HOURS;
use crate::state::AppState;
use crate::{Error, Result};
use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::error;
use vakt_common::Earthquake;

/// Longest accepted live window (one week)
const MAX_WINDOW_HOURS: i64 = 168;

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    /// Trailing window override, defaults to 24 hours
    pub hours: Option<i64>,
}

/// GET /api/earthquakes
///
/// Live normalized earthquake list, newest first. Upstream failures
/// surface as a tagged error; no partial data.
pub async fn get_live(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
) -> Result<Json<Vec<Earthquake>>> {
    let hours = query.hours.unwrap_or(DEFAULT_WINDOW_HOURS);
    if !(1..=MAX_WINDOW_HOURS).contains(&hours) {
        return Err(Error::InvalidInput(format!(
            "hours must be between 1 and {}",
            MAX_WINDOW_HOURS
        )));
    }

    let quakes = state.seismic.fetch_window(hours).await.map_err(|e| {
        error!("live seismic fetch failed: {}", e);
        e
    })?;
    Ok(Json(quakes))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub start: String,
    pub end: String,
}

/// GET /api/earthquakes/history?start=YYYY-MM-DD&end=YYYY-MM-DD
///
/// Malformed dates are rejected up front; everything after that is a
/// 200 — an unusable upstream response yields a synthetic batch tagged
/// as mock data, never an error.
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryBatch>> {
    let start = parse_date(&query.start)?;
    let end = parse_date(&query.end)?;
    if start > end {
        return Err(Error::InvalidInput("start must not be after end".to_string()));
    }

    Ok(Json(state.history.fetch(start, end).await))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("invalid date: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-01-01").is_ok());
        assert!(parse_date("2024-1-1").is_err());
        assert!(parse_date("01/01/2024").is_err());
        assert!(parse_date("2024-01-01T00:00:00Z").is_err());
    }
}
