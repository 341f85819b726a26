//! Upstream seismic data fetchers

pub mod history;
pub mod seismic;

pub use history::{HistoryBatch, HistoryClient};
pub use seismic::SeismicClient;
