//! Fixed enumeration of overlay datasets
//!
//! Every dataset read/write funnels through `DatasetKey`. A name outside
//! this enumeration is a client error, never a store error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Logical dataset names persisted in the key-value store.
///
/// Each value is stored wholesale under its physical key and replaced
/// entirely on write (last-writer-wins, no merge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKey {
    GpsStations,
    LavaFlows,
    Berms,
    Fissures,
    YoutubeFeeds,
    Settings,
    WelcomeMessage,
}

impl DatasetKey {
    /// All dataset keys, in display order
    pub const ALL: [DatasetKey; 7] = [
        DatasetKey::GpsStations,
        DatasetKey::LavaFlows,
        DatasetKey::Berms,
        DatasetKey::Fissures,
        DatasetKey::YoutubeFeeds,
        DatasetKey::Settings,
        DatasetKey::WelcomeMessage,
    ];

    /// URL-facing name
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKey::GpsStations => "gps-stations",
            DatasetKey::LavaFlows => "lava-flows",
            DatasetKey::Berms => "berms",
            DatasetKey::Fissures => "fissures",
            DatasetKey::YoutubeFeeds => "youtube-feeds",
            DatasetKey::Settings => "settings",
            DatasetKey::WelcomeMessage => "welcome-message",
        }
    }

    /// Physical key in the key-value store
    ///
    /// Namespaced so a shared store instance cannot collide with
    /// counters or the update log.
    pub fn storage_key(&self) -> String {
        format!("vakt:dataset:{}", self.as_str())
    }

    /// Value served when the dataset has never been written or the
    /// store read fails (degrade, never blank)
    pub fn default_value(&self) -> Value {
        match self {
            DatasetKey::GpsStations
            | DatasetKey::LavaFlows
            | DatasetKey::Berms
            | DatasetKey::Fissures
            | DatasetKey::YoutubeFeeds => json!([]),
            DatasetKey::Settings => json!({}),
            DatasetKey::WelcomeMessage => Value::Null,
        }
    }
}

impl FromStr for DatasetKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DatasetKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownDataset(s.to_string()))
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
