//! Key-value store access

pub mod store;

pub use store::KvStore;

/// Physical key of the capped update log list
pub const UPDATE_LOG_KEY: &str = "vakt:updates";

/// Maximum retained update-log entries
pub const UPDATE_LOG_CAP: u64 = 50;

/// Physical key prefix for named counters
pub fn counter_key(name: &str) -> String {
    format!("vakt:counter:{}", name)
}

/// Physical key of the stored version document
pub const VERSION_KEY: &str = "vakt:version";
