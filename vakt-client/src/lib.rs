//! # Vakt Client Library (vakt-client)
//!
//! Native consumer of the Vakt dashboard API:
//! - Dataset hook: periodic revalidation, read dedup, and optimistic
//!   writes with explicit rollback
//! - Notification-threshold evaluator deciding which fresh earthquakes
//!   deserve an audible alert

pub mod alert;
pub mod error;
pub mod evaluator;
pub mod hook;
pub mod snapshot;

pub use alert::{Alert, AlertKind, AlertSink, LogAlertSink};
pub use error::{Error, Result};
pub use evaluator::{AlertEvaluator, EvaluatorSettings};
pub use hook::{DatasetClient, DatasetHook, WriteStatus};
pub use snapshot::{MemorySnapshotStore, SnapshotStore};
