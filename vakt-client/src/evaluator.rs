//! Notification-threshold evaluator
//!
//! Decides, for each fresh earthquake list, which events deserve an
//! audible alert. The threshold exists to prevent alert storms during
//! swarms of hundreds of micro-earthquakes while still surfacing events
//! human reviewers have promoted or that are individually significant.

use crate::alert::{Alert, AlertKind, AlertSink};
use crate::snapshot::{Snapshot, SnapshotStore};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use vakt_common::{Earthquake, Review};

/// Evaluator tuning
#[derive(Debug, Clone)]
pub struct EvaluatorSettings {
    /// Alert on automatic-to-confirmed review transitions
    pub review_change_notifications: bool,
    /// Trailing-hour event count above which low-magnitude alerts are
    /// suppressed
    pub high_activity_threshold: usize,
    /// Events strictly above this magnitude always alert
    pub magnitude_floor: f64,
    /// Playback volume handed to the sink, 0.0-1.0
    pub volume: f32,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        EvaluatorSettings {
            review_change_notifications: true,
            high_activity_threshold: 30,
            magnitude_floor: 1.0,
            volume: 0.75,
        }
    }
}

/// Stateful evaluator; one per consumer
pub struct AlertEvaluator<S: SnapshotStore, A: AlertSink> {
    snapshot: S,
    sink: A,
    settings: EvaluatorSettings,
}

impl<S: SnapshotStore, A: AlertSink> AlertEvaluator<S, A> {
    pub fn new(snapshot: S, sink: A, settings: EvaluatorSettings) -> Self {
        AlertEvaluator {
            snapshot,
            sink,
            settings,
        }
    }

    /// Run the decision rule against a fresh list.
    ///
    /// Fires at most one alert per surviving event, then replaces the
    /// stored snapshot with the fresh identity map regardless of
    /// whether anything fired — so an identical re-run is silent.
    pub fn evaluate(&self, now: DateTime<Utc>, fresh: &[Earthquake]) -> Vec<Alert> {
        let hour_ago = now - Duration::hours(1);
        let trailing_hour = fresh.iter().filter(|q| q.time > hour_ago).count();
        let previous = self.snapshot.load();

        let mut fired = Vec::new();
        for quake in fresh {
            let Some(kind) = candidate_kind(&previous, quake) else {
                continue;
            };

            if self.should_notify(kind, quake, trailing_hour) {
                let alert = Alert {
                    kind,
                    quake: quake.clone(),
                    volume: self.settings.volume,
                };
                if let Err(e) = self.sink.play(&alert) {
                    warn!("alert playback failed: {}", e);
                }
                fired.push(alert);
            }
        }

        debug!(
            fresh = fresh.len(),
            trailing_hour,
            fired = fired.len(),
            "evaluated earthquake list"
        );

        self.snapshot
            .save(fresh.iter().map(|q| (q.identity(), q.clone())).collect());
        fired
    }

    fn should_notify(&self, kind: AlertKind, quake: &Earthquake, trailing_hour: usize) -> bool {
        let significant = quake.size > self.settings.magnitude_floor;
        match kind {
            AlertKind::ReviewChange => self.settings.review_change_notifications && significant,
            AlertKind::NewQuake => {
                if trailing_hour > self.settings.high_activity_threshold {
                    significant
                } else {
                    true
                }
            }
        }
    }
}

/// New event, review transition, or nothing
fn candidate_kind(previous: &Snapshot, quake: &Earthquake) -> Option<AlertKind> {
    match previous.get(&quake.identity()) {
        None => Some(AlertKind::NewQuake),
        Some(prev)
            if prev.review == Some(Review::Automatic)
                && quake.review == Some(Review::Confirmed) =>
        {
            Some(AlertKind::ReviewChange)
        }
        Some(_) => None,
    }
}
