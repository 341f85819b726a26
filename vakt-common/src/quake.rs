//! Canonical earthquake record
//!
//! Records are immutable once retrieved from the upstream API. The
//! upstream guarantees no stable event id, so identity is the composite
//! tuple (timestamp, lat, lon, depth, size). Two coincidentally identical
//! records therefore collapse to one identity; this ambiguity is carried
//! deliberately rather than corrected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review status of an earthquake magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Review {
    /// Algorithmically estimated magnitude
    #[serde(rename = "am")]
    Automatic,
    /// Confirmed by a human analyst
    #[serde(rename = "mlw")]
    Confirmed,
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Review::Automatic => write!(f, "am"),
            Review::Confirmed => write!(f, "mlw"),
        }
    }
}

/// A normalized earthquake record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earthquake {
    /// Upstream event id when present, otherwise derived from identity
    pub id: String,
    /// Event time (ISO-8601 on the wire)
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Depth in kilometers
    pub depth: f64,
    /// Magnitude
    pub size: f64,
    /// Quality score assigned by the upstream network
    pub quality: f64,
    /// Named volcanic region, or a coordinate string when no region matches
    pub human_readable_location: String,
    /// Absent when the upstream did not report a magnitude type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
}

/// Composite earthquake identity
///
/// Coordinates and magnitude are fixed-precision-formatted so float
/// noise cannot split one event into two identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuakeId(String);

impl QuakeId {
    pub fn new(time: DateTime<Utc>, lat: f64, lon: f64, depth: f64, size: f64) -> Self {
        QuakeId(format!(
            "{}|{:.5}|{:.5}|{:.3}|{:.2}",
            time.timestamp(),
            lat,
            lon,
            depth,
            size
        ))
    }
}

impl fmt::Display for QuakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Earthquake {
    /// Identity tuple (timestamp, lat, lon, depth, size)
    pub fn identity(&self) -> QuakeId {
        QuakeId::new(self.time, self.latitude, self.longitude, self.depth, self.size)
    }
}
