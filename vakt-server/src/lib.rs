//! # Vakt Server Library (vakt-server)
//!
//! HTTP service for the Vakt dashboard.
//!
//! **Purpose:** Proxy the hosted key-value store behind a fixed dataset
//! enumeration, normalize upstream seismic records, and push
//! dataset-changed events to connected clients over SSE.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod kv;
pub mod sse;
pub mod state;

pub use api::build_router;
pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
