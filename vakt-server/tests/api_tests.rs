//! End-to-end tests for the REST + SSE surface

mod helpers;

use futures::StreamExt;
use helpers::{TestServer, TestServerOptions};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use vakt_common::events::VaktEvent;
use vakt_common::DatasetKey;

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;

    let response = server.http.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "vakt-server");
}

#[tokio::test]
async fn test_dataset_write_then_read_is_exact() {
    let server = TestServer::start().await;
    let payload = json!([{ "id": "b1", "height": 8, "coordinates": [63.88, -22.43] }]);

    let response = server
        .http
        .post(server.url("/api/dataset/berms"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let read: Value = server
        .http
        .get(server.url("/api/dataset/berms"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read, payload, "read returns exactly the written payload");
    assert!(
        server.kv.raw_get("vakt:dataset:berms").is_some(),
        "stored under the namespaced physical key"
    );
}

#[tokio::test]
async fn test_preexisting_store_value_is_served() {
    let server = TestServer::start().await;
    server.kv.raw_set("vakt:dataset:welcome-message", "\"Velkomin á vaktina\"");

    let read: Value = server
        .http
        .get(server.url("/api/dataset/welcome-message"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read, json!("Velkomin á vaktina"));
}

#[tokio::test]
async fn test_dataset_write_replaces_wholesale() {
    let server = TestServer::start().await;

    for payload in [json!([{ "id": "old" }]), json!([{ "id": "new" }])] {
        server
            .http
            .post(server.url("/api/dataset/fissures"))
            .json(&payload)
            .send()
            .await
            .unwrap();
    }

    let read: Value = server
        .http
        .get(server.url("/api/dataset/fissures"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read, json!([{ "id": "new" }]), "no merge with prior value");
}

#[tokio::test]
async fn test_unknown_dataset_is_client_error_without_store_traffic() {
    let server = TestServer::start().await;

    let response = server
        .http
        .get(server.url("/api/dataset/lava-flow"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("lava-flow"));
    assert_eq!(server.kv.request_count(), 0, "rejected before any store access");
}

#[tokio::test]
async fn test_unset_dataset_serves_default() {
    let server = TestServer::start().await;

    let read: Value = server
        .http
        .get(server.url("/api/dataset/gps-stations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read, json!([]));

    let read: Value = server
        .http
        .get(server.url("/api/dataset/welcome-message"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read, Value::Null);
}

#[tokio::test]
async fn test_null_write_is_rejected() {
    let server = TestServer::start().await;

    let response = server
        .http
        .post(server.url("/api/dataset/berms"))
        .json(&Value::Null)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dataset_write_broadcasts_data_update() {
    let server = TestServer::start().await;
    let mut rx = server.state.updates.subscribe();

    server
        .http
        .post(server.url("/api/dataset/berms"))
        .json(&json!([{ "id": "b1" }]))
        .send()
        .await
        .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no broadcast within timeout")
        .unwrap();
    match event {
        VaktEvent::DataUpdate { dataset, .. } => assert_eq!(dataset, DatasetKey::Berms),
        other => panic!("wrong event: {:?}", other),
    }
}

#[tokio::test]
async fn test_data_sync_stream_emits_connected_then_updates() {
    let server = TestServer::start().await;

    let response = server
        .http
        .get(server.url("/api/data-sync"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mut stream = response.bytes_stream();

    let first = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("no connected event")
        .unwrap()
        .unwrap();
    let first = String::from_utf8_lossy(&first).to_string();
    assert!(first.contains("event: connected"), "got: {}", first);
    assert!(first.contains("client_id"));

    server
        .http
        .post(server.url("/api/dataset/lava-flows"))
        .json(&json!([{ "id": "flow" }]))
        .send()
        .await
        .unwrap();

    let mut seen = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout_at(deadline, stream.next()).await {
            Ok(Some(Ok(chunk))) => {
                seen.push_str(&String::from_utf8_lossy(&chunk));
                if seen.contains("event: data-update") {
                    break;
                }
            }
            _ => break,
        }
    }
    assert!(seen.contains("event: data-update"), "got: {}", seen);
    assert!(seen.contains("\"dataset\":\"lava-flows\""), "got: {}", seen);
}

#[tokio::test]
async fn test_admin_token_guards_writes() {
    let server = TestServer::start_with(TestServerOptions {
        admin_token: Some("hunter2".to_string()),
        ..Default::default()
    })
    .await;

    let response = server
        .http
        .post(server.url("/api/dataset/berms"))
        .json(&json!([]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = server
        .http
        .post(server.url("/api/dataset/berms"))
        .header("x-admin-token", "hunter2")
        .json(&json!([{ "id": "b1" }]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Reads stay open
    let response = server
        .http
        .get(server.url("/api/dataset/berms"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_version_roundtrip() {
    let server = TestServer::start().await;

    let initial: Value = server
        .http
        .get(server.url("/api/version"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(initial, json!({ "version": null }));

    server
        .http
        .post(server.url("/api/version"))
        .json(&json!({ "version": "2.4.0", "note": "new berm editor" }))
        .send()
        .await
        .unwrap();

    let published: Value = server
        .http
        .get(server.url("/api/version"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(published["version"], "2.4.0");
    assert_eq!(published["note"], "new berm editor");
    assert!(published["published_at"].is_string());
}

#[tokio::test]
async fn test_counter_increments() {
    let server = TestServer::start().await;

    let initial: Value = server
        .http
        .get(server.url("/api/counter/visits"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(initial["value"], 0);

    for expected in 1..=2 {
        let bumped: Value = server
            .http
            .post(server.url("/api/counter/visits"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(bumped["value"], expected);
    }

    let response = server
        .http
        .post(server.url("/api/counter/Not%20Valid"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recent_updates_log() {
    let server = TestServer::start().await;

    for key in ["berms", "fissures"] {
        server
            .http
            .post(server.url(&format!("/api/dataset/{}", key)))
            .json(&json!([]))
            .send()
            .await
            .unwrap();
    }

    // Null is a rejected write and must not appear in the log
    server
        .http
        .post(server.url("/api/dataset/berms"))
        .json(&Value::Null)
        .send()
        .await
        .unwrap();

    let entries: Vec<Value> = server
        .http
        .get(server.url("/api/updates/recent"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["dataset"], "fissures", "newest first");
    assert_eq!(entries[1]["dataset"], "berms");
}

#[tokio::test]
async fn test_live_earthquakes_normalized() {
    let server = TestServer::start_with(TestServerOptions {
        seismic_payload: json!({
            "data": {
                "event_id": [101, 102, 103],
                "time": [1700003600, 1700000000, null],
                "lat": [63.90, 63.91, 63.92],
                "long": [-22.27, -22.28, -22.29],
                "depth": [5.0, 6.0, 7.0],
                "magnitude": [1.2, 0.4, 2.0],
                "quality": [90.1, 55.0, 70.0],
                "magnitude_type": ["autmag", "mlw", "mlw"],
            }
        }),
        ..Default::default()
    })
    .await;

    let quakes: Vec<Value> = server
        .http
        .get(server.url("/api/earthquakes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(quakes.len(), 2, "row with null time skipped");
    assert_eq!(quakes[0]["id"], "101", "newest first");
    assert_eq!(quakes[0]["review"], "am");
    assert_eq!(quakes[1]["review"], "mlw");
    assert_eq!(quakes[0]["humanReadableLocation"], "Fagradalsfjall");
}

#[tokio::test]
async fn test_live_earthquakes_empty_upstream_is_bad_gateway() {
    let server = TestServer::start().await;

    let response = server
        .http
        .get(server.url("/api/earthquakes"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_live_earthquakes_rejects_bad_window() {
    let server = TestServer::start().await;

    let response = server
        .http
        .get(server.url("/api/earthquakes?hours=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_empty_upstream_serves_synthetic() {
    let server = TestServer::start().await;

    let response = server
        .http
        .get(server.url("/api/earthquakes/history?start=2024-01-01&end=2024-01-02"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "fallback is not an error");

    let batch: Value = response.json().await.unwrap();
    assert_eq!(batch["mock"], true);
    assert!(!batch["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_real_upstream_passes_through() {
    let server = TestServer::start_with(TestServerOptions {
        history_payload: json!({
            "results": [
                { "event_id": "h1", "time": 1700000000, "lat": 63.90, "long": -22.27,
                  "depth": 5.0, "magnitude": 1.5, "quality": 80.0, "magnitude_type": "mlw" }
            ]
        }),
        ..Default::default()
    })
    .await;

    let batch: Value = server
        .http
        .get(server.url("/api/earthquakes/history?start=2024-01-01&end=2024-01-02"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(batch["mock"], false);
    assert_eq!(batch["results"][0]["id"], "h1");
}

#[tokio::test]
async fn test_history_rejects_malformed_dates() {
    let server = TestServer::start().await;

    let response = server
        .http
        .get(server.url("/api/earthquakes/history?start=01/01/2024&end=2024-01-02"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .http
        .get(server.url("/api/earthquakes/history?start=2024-02-01&end=2024-01-01"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
