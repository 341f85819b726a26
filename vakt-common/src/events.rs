//! Event types pushed to connected dashboard clients
//!
//! Events are ephemeral and in-memory only. Delivery is best-effort,
//! at-most-once per connected client; missed events are recovered by
//! polling revalidation, never by replay.

use crate::datasets::DatasetKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-push events emitted on the data-sync stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum VaktEvent {
    /// First event on every new stream
    Connected {
        client_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A dataset was replaced; clients revalidate, payloads are not pushed
    DataUpdate {
        dataset: DatasetKey,
        timestamp: DateTime<Utc>,
    },
}

impl VaktEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            VaktEvent::Connected { .. } => "connected",
            VaktEvent::DataUpdate { .. } => "data-update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_update_wire_format() {
        let event = VaktEvent::DataUpdate {
            dataset: DatasetKey::Berms,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type(), "data-update");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"data-update\""));
        assert!(json.contains("\"dataset\":\"berms\""));

        let back: VaktEvent = serde_json::from_str(&json).unwrap();
        match back {
            VaktEvent::DataUpdate { dataset, .. } => assert_eq!(dataset, DatasetKey::Berms),
            _ => panic!("wrong event type deserialized"),
        }
    }

    #[test]
    fn test_connected_wire_format() {
        let event = VaktEvent::Connected {
            client_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type(), "connected");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("client_id"));
    }
}
