//! Live seismic data fetcher and normalizer
//!
//! Queries the upstream seismic API with a fixed bounding box covering
//! Iceland and zips the column-oriented response into canonical
//! `Earthquake` records. A record missing required fields is skipped
//! with a logged warning; an empty or malformed payload fails the whole
//! request. No partial data is returned from whole-request failures.

use crate::{Error, Result};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use vakt_common::{regions, Earthquake, QuakeId, Review};

/// Magnitude-type sentinel marking an algorithmically estimated magnitude
pub const AUTOMATIC_MAGNITUDE_TYPE: &str = "autmag";

/// Default request window
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Corners of the fixed bounding box covering Iceland (lat, lon)
const ICELAND_AREA: [[f64; 2]; 4] = [
    [67.5, -25.5],
    [67.5, -12.0],
    [62.5, -12.0],
    [62.5, -25.5],
];

const DEPTH_MIN_KM: f64 = 0.0;
const DEPTH_MAX_KM: f64 = 25.0;
// Micro-earthquakes carry negative magnitudes; the floor must include them
const SIZE_MIN: f64 = -2.0;
const SIZE_MAX: f64 = 10.0;

const USER_AGENT: &str = concat!("vakt/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct QuakeRequest {
    start_time: String,
    end_time: String,
    depth_min: f64,
    depth_max: f64,
    size_min: f64,
    size_max: f64,
    area: Vec<[f64; 2]>,
    fields: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct QuakeResponse {
    #[serde(default)]
    data: QuakeColumns,
}

/// Column-oriented upstream payload, zipped by index into records
#[derive(Debug, Default, Deserialize)]
pub struct QuakeColumns {
    #[serde(default)]
    event_id: Vec<Option<serde_json::Value>>,
    #[serde(default)]
    time: Vec<Option<i64>>,
    #[serde(default)]
    lat: Vec<Option<f64>>,
    #[serde(default)]
    long: Vec<Option<f64>>,
    #[serde(default)]
    depth: Vec<Option<f64>>,
    #[serde(default)]
    magnitude: Vec<Option<f64>>,
    #[serde(default)]
    quality: Vec<Option<f64>>,
    #[serde(default)]
    magnitude_type: Vec<Option<String>>,
}

impl QuakeColumns {
    fn len(&self) -> usize {
        [
            self.time.len(),
            self.lat.len(),
            self.long.len(),
            self.depth.len(),
            self.magnitude.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    fn column<T: Clone>(column: &[Option<T>], index: usize) -> Option<T> {
        column.get(index).cloned().flatten()
    }
}

/// Zip columns into normalized records, newest first
pub fn normalize(columns: &QuakeColumns) -> Result<Vec<Earthquake>> {
    let len = columns.len();
    if len == 0 {
        return Err(Error::Upstream("empty seismic payload".to_string()));
    }

    let mut quakes = Vec::with_capacity(len);
    for i in 0..len {
        let time = QuakeColumns::column(&columns.time, i);
        let lat = QuakeColumns::column(&columns.lat, i);
        let lon = QuakeColumns::column(&columns.long, i);
        let depth = QuakeColumns::column(&columns.depth, i);
        let size = QuakeColumns::column(&columns.magnitude, i);

        let (Some(epoch), Some(lat), Some(lon), Some(depth), Some(size)) =
            (time, lat, lon, depth, size)
        else {
            warn!(row = i, "skipping seismic record with missing fields");
            continue;
        };

        let Some(time) = Utc.timestamp_opt(epoch, 0).single() else {
            warn!(row = i, epoch, "skipping seismic record with invalid timestamp");
            continue;
        };

        let review = QuakeColumns::column(&columns.magnitude_type, i).map(|kind| {
            if kind == AUTOMATIC_MAGNITUDE_TYPE {
                Review::Automatic
            } else {
                Review::Confirmed
            }
        });

        let id = QuakeColumns::column(&columns.event_id, i)
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| QuakeId::new(time, lat, lon, depth, size).to_string());

        quakes.push(Earthquake {
            id,
            time,
            latitude: lat,
            longitude: lon,
            depth,
            size,
            quality: QuakeColumns::column(&columns.quality, i).unwrap_or(0.0),
            human_readable_location: regions::locate(lat, lon),
            review,
        });
    }

    quakes.sort_by(|a, b| b.time.cmp(&a.time));
    Ok(quakes)
}

/// Client for the live seismic endpoint
#[derive(Clone)]
pub struct SeismicClient {
    http: reqwest::Client,
    url: String,
}

impl SeismicClient {
    pub fn new(url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Upstream(e.to_string()))?;
        Ok(SeismicClient { http, url })
    }

    /// Fetch and normalize the trailing window (UTC)
    pub async fn fetch_window(&self, hours: i64) -> Result<Vec<Earthquake>> {
        let end = Utc::now();
        let start = end - ChronoDuration::hours(hours);
        self.fetch_range(start, end).await
    }

    pub async fn fetch_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Earthquake>> {
        let request = QuakeRequest {
            start_time: start.format("%Y-%m-%d %H:%M:%S").to_string(),
            end_time: end.format("%Y-%m-%d %H:%M:%S").to_string(),
            depth_min: DEPTH_MIN_KM,
            depth_max: DEPTH_MAX_KM,
            size_min: SIZE_MIN,
            size_max: SIZE_MAX,
            area: ICELAND_AREA.to_vec(),
            fields: vec![
                "event_id",
                "time",
                "lat",
                "long",
                "depth",
                "magnitude",
                "quality",
                "magnitude_type",
            ],
        };

        debug!(url = %self.url, start = %request.start_time, end = %request.end_time, "querying seismic API");

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "seismic API returned {}: {}",
                status, text
            )));
        }

        let payload: QuakeResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("malformed seismic payload: {}", e)))?;

        let quakes = normalize(&payload.data)?;
        info!(count = quakes.len(), "normalized seismic batch");
        Ok(quakes)
    }
}
