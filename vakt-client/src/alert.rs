//! Audible alert dispatch seam
//!
//! The evaluator decides; the sink plays. Hosts plug in whatever audio
//! backend they have. Sink failures are caught and logged by the
//! evaluator, never propagated.

use crate::Result;
use serde::Serialize;
use tracing::info;
use vakt_common::Earthquake;

/// Why an alert fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    /// Identity not present in the previous snapshot
    NewQuake,
    /// Review status transitioned from automatic to confirmed
    ReviewChange,
}

/// One audible alert for one surviving event
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub quake: Earthquake,
    /// Playback volume, 0.0-1.0
    pub volume: f32,
}

/// Host-provided audio backend
pub trait AlertSink: Send + Sync {
    fn play(&self, alert: &Alert) -> Result<()>;
}

/// Sink that only logs; useful headless and in tests
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn play(&self, alert: &Alert) -> Result<()> {
        info!(
            kind = ?alert.kind,
            magnitude = alert.quake.size,
            location = %alert.quake.human_readable_location,
            "earthquake alert"
        );
        Ok(())
    }
}
