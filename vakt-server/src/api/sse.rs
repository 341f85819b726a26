//! Server-Sent Events stream for data-sync
//!
//! Streams `connected` and `data-update` events to each browser tab.
//! Payloads are never pushed; clients revalidate the named dataset.

use crate::state::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::Utc;
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vakt_common::events::VaktEvent;

/// GET /api/data-sync - SSE event stream
pub async fn data_sync(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let client_id = Uuid::new_v4();
    info!(
        %client_id,
        "SSE client connected ({} already active)",
        state.updates.client_count()
    );

    let rx = state.updates.subscribe();

    let stream = async_stream::stream! {
        let connected = VaktEvent::Connected {
            client_id,
            timestamp: Utc::now(),
        };
        if let Some(event) = to_sse_event(&connected) {
            yield Ok(event);
        }

        let mut events = BroadcastStream::new(rx);
        while let Some(result) = events.next().await {
            match result {
                Ok(event) => {
                    if let Some(event) = to_sse_event(&event) {
                        yield Ok(event);
                    }
                }
                Err(e) => {
                    // Lagged connection: drop the missed events and move
                    // on; the client recovers them by polling
                    warn!(%client_id, "SSE stream lagged: {:?}", e);
                }
            }
        }

        debug!(%client_id, "SSE client disconnected");
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(state.config.heartbeat_secs))
            .text("keep-alive"),
    )
}

fn to_sse_event(event: &VaktEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Event::default().event(event.event_type()).data(json)),
        Err(e) => {
            warn!("failed to serialize event: {}", e);
            None
        }
    }
}
