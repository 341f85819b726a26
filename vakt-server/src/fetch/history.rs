//! Historical seismic data fetcher with synthetic fallback
//!
//! The historical path must never leave the dashboard blank: a timeout
//! (fixed, 15 s by default), an empty response, or a malformed response
//! all substitute a locally generated synthetic batch tagged as mock
//! data instead of surfacing an error.

use crate::Result;
use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use vakt_common::{regions, Earthquake, QuakeId, Review};

const USER_AGENT: &str = concat!("vakt/", env!("CARGO_PKG_VERSION"));

/// Reykjanes peninsula box used for synthetic epicenters
const MOCK_LAT_RANGE: (f64, f64) = (63.80, 63.98);
const MOCK_LON_RANGE: (f64, f64) = (-22.60, -21.90);

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    results: Vec<HistoryRow>,
}

/// Row-oriented upstream record; incomplete rows are skipped
#[derive(Debug, Deserialize)]
struct HistoryRow {
    event_id: Option<serde_json::Value>,
    time: Option<i64>,
    lat: Option<f64>,
    long: Option<f64>,
    depth: Option<f64>,
    magnitude: Option<f64>,
    quality: Option<f64>,
    magnitude_type: Option<String>,
}

/// Historical batch served to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryBatch {
    /// True when the batch is locally generated sample data
    pub mock: bool,
    pub results: Vec<Earthquake>,
}

/// Client for the historical endpoint
#[derive(Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    url: String,
}

impl HistoryClient {
    pub fn new(url: String, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| crate::Error::Upstream(e.to_string()))?;
        Ok(HistoryClient { http, url })
    }

    /// Fetch the window, substituting synthetic data on any failure
    pub async fn fetch(&self, start: NaiveDate, end: NaiveDate) -> HistoryBatch {
        match self.try_fetch(start, end).await {
            Ok(results) if !results.is_empty() => {
                info!(count = results.len(), "historical batch retrieved");
                HistoryBatch { mock: false, results }
            }
            Ok(_) => {
                warn!("historical API returned no records; serving synthetic data");
                synthetic_batch(start, end)
            }
            Err(e) => {
                warn!("historical fetch failed ({}); serving synthetic data", e);
                synthetic_batch(start, end)
            }
        }
    }

    async fn try_fetch(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Earthquake>> {
        debug!(url = %self.url, %start, %end, "querying historical API");

        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", end.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await
            .map_err(|e| crate::Error::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(crate::Error::Upstream(format!(
                "historical API returned {}",
                status
            )));
        }

        let payload: HistoryResponse = response
            .json()
            .await
            .map_err(|e| crate::Error::Upstream(format!("malformed historical payload: {}", e)))?;

        let mut quakes: Vec<Earthquake> = payload
            .results
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| match normalize_row(row) {
                Some(quake) => Some(quake),
                None => {
                    warn!(row = i, "skipping historical record with missing fields");
                    None
                }
            })
            .collect();

        quakes.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(quakes)
    }
}

fn normalize_row(row: HistoryRow) -> Option<Earthquake> {
    let epoch = row.time?;
    let lat = row.lat?;
    let lon = row.long?;
    let depth = row.depth?;
    let size = row.magnitude?;
    let time = Utc.timestamp_opt(epoch, 0).single()?;

    let review = row.magnitude_type.map(|kind| {
        if kind == super::seismic::AUTOMATIC_MAGNITUDE_TYPE {
            Review::Automatic
        } else {
            Review::Confirmed
        }
    });

    let id = row
        .event_id
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| QuakeId::new(time, lat, lon, depth, size).to_string());

    Some(Earthquake {
        id,
        time,
        latitude: lat,
        longitude: lon,
        depth,
        size,
        quality: row.quality.unwrap_or(0.0),
        human_readable_location: regions::locate(lat, lon),
        review,
    })
}

/// Generate a non-empty synthetic batch covering the requested window
pub fn synthetic_batch(start: NaiveDate, end: NaiveDate) -> HistoryBatch {
    // Seed from the window so repeated requests render the same sample
    let seed = start.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp()).unwrap_or(0) as u64;
    let mut rng = StdRng::seed_from_u64(seed);

    let days = (end - start).num_days().max(0) + 1;
    let mut results = Vec::new();

    for day in 0..days {
        let date = start + ChronoDuration::days(day);
        let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
            continue;
        };
        let base = midnight.and_utc();

        let count = rng.gen_range(5..=15);
        for _ in 0..count {
            let time = base + ChronoDuration::seconds(rng.gen_range(0..86_400));
            let lat = rng.gen_range(MOCK_LAT_RANGE.0..MOCK_LAT_RANGE.1);
            let lon = rng.gen_range(MOCK_LON_RANGE.0..MOCK_LON_RANGE.1);
            let depth = rng.gen_range(1.0..12.0);
            let size = rng.gen_range(-0.5..3.5);

            results.push(Earthquake {
                id: QuakeId::new(time, lat, lon, depth, size).to_string(),
                time,
                latitude: lat,
                longitude: lon,
                depth,
                size,
                quality: rng.gen_range(30.0..99.0),
                human_readable_location: regions::locate(lat, lon),
                review: None,
            });
        }
    }

    results.sort_by(|a, b| b.time.cmp(&a.time));
    HistoryBatch { mock: true, results }
}
