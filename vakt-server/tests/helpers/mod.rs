//! Test helpers for vakt-server integration tests
//!
//! Spawns a mock key-value store and mock seismic upstreams as real
//! axum servers on ephemeral ports, then runs the full service router
//! against them.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vakt_common::config::KvConfig;
use vakt_server::config::Config;
use vakt_server::{build_router, AppState};

/// In-memory stand-in for the hosted key-value store.
///
/// Speaks the same single-command protocol the real store does:
/// `/get/{key}`, `/set/{key}`, `/incr/{key}`, `/lpush/{key}`,
/// `/rpop/{key}`, `/lrange/{key}/{start}/{stop}`, all wrapped in
/// `{"result": ...}` envelopes with values stored as strings.
#[derive(Clone, Default)]
pub struct MockKv {
    strings: Arc<Mutex<HashMap<String, String>>>,
    lists: Arc<Mutex<HashMap<String, Vec<String>>>>,
    pub requests: Arc<AtomicUsize>,
}

impl MockKv {
    pub fn raw_get(&self, key: &str) -> Option<String> {
        self.strings.lock().unwrap().get(key).cloned()
    }

    pub fn raw_set(&self, key: &str, value: &str) {
        self.strings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

async fn kv_get(State(kv): State<MockKv>, Path(key): Path<String>) -> Json<Value> {
    kv.requests.fetch_add(1, Ordering::SeqCst);
    let value = kv.strings.lock().unwrap().get(&key).cloned();
    Json(json!({ "result": value }))
}

async fn kv_set(State(kv): State<MockKv>, Path(key): Path<String>, body: String) -> Json<Value> {
    kv.requests.fetch_add(1, Ordering::SeqCst);
    kv.strings.lock().unwrap().insert(key, body);
    Json(json!({ "result": "OK" }))
}

async fn kv_incr(State(kv): State<MockKv>, Path(key): Path<String>) -> Json<Value> {
    kv.requests.fetch_add(1, Ordering::SeqCst);
    let mut strings = kv.strings.lock().unwrap();
    let next = strings
        .get(&key)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
        + 1;
    strings.insert(key, next.to_string());
    Json(json!({ "result": next }))
}

async fn kv_lpush(State(kv): State<MockKv>, Path(key): Path<String>, body: String) -> Json<Value> {
    kv.requests.fetch_add(1, Ordering::SeqCst);
    let mut lists = kv.lists.lock().unwrap();
    let list = lists.entry(key).or_default();
    list.insert(0, body);
    Json(json!({ "result": list.len() }))
}

async fn kv_rpop(State(kv): State<MockKv>, Path(key): Path<String>) -> Json<Value> {
    kv.requests.fetch_add(1, Ordering::SeqCst);
    let mut lists = kv.lists.lock().unwrap();
    let popped = lists.get_mut(&key).and_then(|list| list.pop());
    Json(json!({ "result": popped }))
}

async fn kv_lrange(
    State(kv): State<MockKv>,
    Path((key, start, stop)): Path<(String, i64, i64)>,
) -> Json<Value> {
    kv.requests.fetch_add(1, Ordering::SeqCst);
    let lists = kv.lists.lock().unwrap();
    let items: Vec<String> = lists
        .get(&key)
        .map(|list| {
            let len = list.len() as i64;
            let start = start.clamp(0, len);
            let stop = if stop < 0 { len + stop } else { stop }.min(len - 1);
            if start > stop || len == 0 {
                Vec::new()
            } else {
                list[start as usize..=stop as usize].to_vec()
            }
        })
        .unwrap_or_default();
    Json(json!({ "result": items }))
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn spawn_mock_kv() -> (MockKv, String) {
    let kv = MockKv::default();
    let app = Router::new()
        .route("/get/:key", get(kv_get))
        .route("/set/:key", post(kv_set))
        .route("/incr/:key", get(kv_incr).post(kv_incr))
        .route("/lpush/:key", post(kv_lpush))
        .route("/rpop/:key", post(kv_rpop))
        .route("/lrange/:key/:start/:stop", get(kv_lrange))
        .with_state(kv.clone());
    let url = serve(app).await;
    (kv, url)
}

/// Mock live seismic upstream returning a configurable payload
pub async fn spawn_mock_seismic(payload: Value) -> String {
    let payload = Arc::new(payload);
    let app = Router::new().route(
        "/",
        post(move || {
            let payload = Arc::clone(&payload);
            async move { Json(payload.as_ref().clone()) }
        }),
    );
    serve(app).await
}

/// Mock historical upstream returning a configurable payload
pub async fn spawn_mock_history(payload: Value) -> String {
    let payload = Arc::new(payload);
    let app = Router::new().route(
        "/",
        get(move || {
            let payload = Arc::clone(&payload);
            async move { Json(payload.as_ref().clone()) }
        }),
    );
    serve(app).await
}

/// Full service wired against mocks
pub struct TestServer {
    pub kv: MockKv,
    pub state: AppState,
    pub base_url: String,
    pub http: reqwest::Client,
}

pub struct TestServerOptions {
    pub seismic_payload: Value,
    pub history_payload: Value,
    pub admin_token: Option<String>,
}

impl Default for TestServerOptions {
    fn default() -> Self {
        TestServerOptions {
            seismic_payload: json!({ "data": {} }),
            history_payload: json!({ "results": [] }),
            admin_token: None,
        }
    }
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(TestServerOptions::default()).await
    }

    pub async fn start_with(options: TestServerOptions) -> Self {
        let (kv, kv_url) = spawn_mock_kv().await;
        let seismic_url = spawn_mock_seismic(options.seismic_payload).await;
        let history_url = spawn_mock_history(options.history_payload).await;

        let config = Config {
            port: 0,
            kv: KvConfig {
                url: kv_url,
                token: "test-token".to_string(),
            },
            seismic_api_url: seismic_url,
            history_api_url: history_url,
            heartbeat_secs: 30,
            history_timeout_secs: 2,
            admin_token: options.admin_token,
        };

        let state = AppState::new(config).unwrap();
        let base_url = serve(build_router(state.clone())).await;

        TestServer {
            kv,
            state,
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
