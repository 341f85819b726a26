//! Shared application state
//!
//! Passed to all handlers. The broadcaster is the only shared mutable
//! resource across requests; everything else is per-request.

use crate::config::Config;
use crate::fetch::{HistoryClient, SeismicClient};
use crate::kv::KvStore;
use crate::sse::UpdateBroadcaster;
use crate::Result;
use std::sync::Arc;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub kv: KvStore,
    pub seismic: SeismicClient,
    pub history: HistoryClient,
    pub updates: UpdateBroadcaster,
}

impl AppState {
    /// Create application state from resolved configuration
    pub fn new(config: Config) -> Result<Self> {
        let kv = KvStore::new(&config.kv)?;
        let seismic = SeismicClient::new(config.seismic_api_url.clone())?;
        let history = HistoryClient::new(
            config.history_api_url.clone(),
            config.history_timeout_secs,
        )?;

        Ok(AppState {
            config: Arc::new(config),
            kv,
            seismic,
            history,
            updates: UpdateBroadcaster::default(),
        })
    }
}
