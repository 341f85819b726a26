//! Update broadcaster for real-time client revalidation
//!
//! One broadcaster per process. Subscribing registers a connection;
//! dropping the receiver removes it. A broadcast delivers to a snapshot
//! of current subscribers; a lagged or failed connection never affects
//! delivery to the others. Nothing is persisted and nothing is replayed:
//! clients that miss an event recover by polling.

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use vakt_common::events::VaktEvent;
use vakt_common::DatasetKey;

/// Broadcaster managing connected-client event distribution
#[derive(Clone)]
pub struct UpdateBroadcaster {
    tx: broadcast::Sender<VaktEvent>,
}

impl UpdateBroadcaster {
    /// Create a new broadcaster
    ///
    /// `capacity` bounds events buffered per slow client before it lags.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        info!("update broadcaster initialized with capacity {}", capacity);
        UpdateBroadcaster { tx }
    }

    /// Broadcast an event, ignoring if no clients are connected
    pub fn broadcast_lossy(&self, event: VaktEvent) {
        match self.tx.send(event) {
            Ok(count) => debug!("broadcast event to {} clients", count),
            Err(_) => debug!("broadcast with no connected clients"),
        }
    }

    /// Announce that a dataset was replaced
    pub fn notify_data_update(&self, dataset: DatasetKey) {
        self.broadcast_lossy(VaktEvent::DataUpdate {
            dataset,
            timestamp: Utc::now(),
        });
    }

    /// Current number of connected clients
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Register a new connection
    pub fn subscribe(&self) -> broadcast::Receiver<VaktEvent> {
        self.tx.subscribe()
    }
}

impl Default for UpdateBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}
