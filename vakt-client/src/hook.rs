//! Dataset hook: poll + optimistic write
//!
//! Wraps one dataset endpoint with background revalidation, a read
//! dedup window, and optimistic writes that roll back to the last
//! confirmed server value on failure. Network operations never block
//! the caller beyond awaiting its own future; consumers may render
//! against the `is_refreshing` flag.

use crate::{Error, Result};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vakt_common::DatasetKey;

const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(5);

/// Default background revalidation interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("vakt/", env!("CARGO_PKG_VERSION"));

/// Thin client for the dataset endpoints
#[derive(Clone)]
pub struct DatasetClient {
    http: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
}

impl DatasetClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(DatasetClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_token: None,
        })
    }

    /// Send this token on writes
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    pub async fn fetch(&self, key: DatasetKey) -> Result<Value> {
        let url = format!("{}/api/dataset/{}", self.base_url, key);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }

    pub async fn store(&self, key: DatasetKey, value: &Value) -> Result<()> {
        let url = format!("{}/api/dataset/{}", self.base_url, key);
        let mut request = self.http.post(&url).json(value);
        if let Some(token) = &self.admin_token {
            request = request.header("x-admin-token", token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Outcome of an optimistic write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Applied locally, request in flight
    Pending,
    /// Server accepted; cache reconciled with the authoritative value
    Confirmed,
    /// Server rejected; cache restored to the last confirmed value
    RolledBack,
}

#[derive(Default)]
struct HookState {
    /// Value consumers read (may be optimistic)
    value: Option<Value>,
    /// Last value confirmed by the server
    confirmed: Option<Value>,
    last_fetch: Option<Instant>,
    refreshing: bool,
    write_status: Option<WriteStatus>,
}

/// Poll + optimistic-write wrapper around one dataset
pub struct DatasetHook {
    client: DatasetClient,
    key: DatasetKey,
    dedup_window: Duration,
    state: Arc<Mutex<HookState>>,
    poll_task: Option<JoinHandle<()>>,
}

impl DatasetHook {
    pub fn new(client: DatasetClient, key: DatasetKey) -> Self {
        DatasetHook {
            client,
            key,
            dedup_window: DEFAULT_DEDUP_WINDOW,
            state: Arc::new(Mutex::new(HookState::default())),
            poll_task: None,
        }
    }

    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Cached value, or the dataset default when nothing was fetched yet
    pub fn current(&self) -> Value {
        let state = self.state.lock().expect("hook lock poisoned");
        state
            .value
            .clone()
            .unwrap_or_else(|| self.key.default_value())
    }

    /// True while a fetch or write is in flight
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().expect("hook lock poisoned").refreshing
    }

    /// Status of the most recent write, if any
    pub fn write_status(&self) -> Option<WriteStatus> {
        self.state.lock().expect("hook lock poisoned").write_status
    }

    /// Revalidate against the server.
    ///
    /// Identical reads within the dedup window share the cached value
    /// instead of issuing new requests. Failed reads keep (and return)
    /// the cached value so consumers degrade instead of blanking.
    pub async fn refresh(&self) -> Value {
        refresh_shared(
            &self.client,
            self.key,
            &self.state,
            self.dedup_window,
        )
        .await;
        self.current()
    }

    /// Revalidate ignoring the dedup window (focus/reconnect recovery)
    pub async fn refresh_now(&self) -> Value {
        refresh_shared(&self.client, self.key, &self.state, Duration::ZERO).await;
        self.current()
    }

    /// Start background revalidation on `interval`.
    ///
    /// The timer is independent of any other hook and is aborted when
    /// the hook is dropped.
    pub fn start_polling(&mut self, interval: Duration) {
        if self.poll_task.is_some() {
            return;
        }

        let client = self.client.clone();
        let key = self.key;
        let state = Arc::clone(&self.state);
        let dedup_window = self.dedup_window;

        self.poll_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick is immediate; skip it so starting the poller
            // right after a manual refresh does not double-fetch
            ticker.tick().await;
            loop {
                ticker.tick().await;
                refresh_shared(&client, key, &state, dedup_window).await;
            }
        }));
    }

    /// Optimistic write: apply locally, send, reconcile or roll back.
    ///
    /// Returns the final status; `Pending` is observable through
    /// `write_status()` while the request is in flight.
    pub async fn write(&self, value: Value) -> WriteStatus {
        {
            let mut state = self.state.lock().expect("hook lock poisoned");
            state.value = Some(value.clone());
            state.write_status = Some(WriteStatus::Pending);
            state.refreshing = true;
        }

        let outcome = match self.client.store(self.key, &value).await {
            Ok(()) => {
                // Reconcile with the authoritative value
                match self.client.fetch(self.key).await {
                    Ok(server_value) => {
                        let mut state = self.state.lock().expect("hook lock poisoned");
                        state.value = Some(server_value.clone());
                        state.confirmed = Some(server_value);
                        state.last_fetch = Some(Instant::now());
                    }
                    Err(e) => {
                        // Write landed; keep the optimistic value until
                        // the next revalidation
                        warn!("post-write revalidation failed for {}: {}", self.key, e);
                        let mut state = self.state.lock().expect("hook lock poisoned");
                        state.confirmed = Some(value);
                    }
                }
                WriteStatus::Confirmed
            }
            Err(e) => {
                warn!("write failed for {} ({}); rolling back", self.key, e);
                let restored = match self.client.fetch(self.key).await {
                    Ok(server_value) => {
                        let mut state = self.state.lock().expect("hook lock poisoned");
                        state.last_fetch = Some(Instant::now());
                        state.confirmed = Some(server_value.clone());
                        Some(server_value)
                    }
                    Err(_) => {
                        let state = self.state.lock().expect("hook lock poisoned");
                        state.confirmed.clone()
                    }
                };
                let mut state = self.state.lock().expect("hook lock poisoned");
                state.value = restored;
                WriteStatus::RolledBack
            }
        };

        let mut state = self.state.lock().expect("hook lock poisoned");
        state.write_status = Some(outcome);
        state.refreshing = false;
        outcome
    }
}

impl Drop for DatasetHook {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

/// Fetch into the shared state unless a recent fetch already covers it
async fn refresh_shared(
    client: &DatasetClient,
    key: DatasetKey,
    state: &Arc<Mutex<HookState>>,
    dedup_window: Duration,
) {
    {
        let mut state = state.lock().expect("hook lock poisoned");
        let recent = state
            .last_fetch
            .map(|at| at.elapsed() < dedup_window)
            .unwrap_or(false);
        if (recent && state.value.is_some()) || state.refreshing {
            debug!("dedup: skipping {} fetch", key);
            return;
        }
        state.refreshing = true;
    }

    let result = client.fetch(key).await;

    let mut state = state.lock().expect("hook lock poisoned");
    state.refreshing = false;
    match result {
        Ok(value) => {
            state.value = Some(value.clone());
            state.confirmed = Some(value);
            state.last_fetch = Some(Instant::now());
        }
        Err(e) => {
            // Keep serving the cached value
            warn!("refresh failed for {}: {}", key, e);
        }
    }
}
