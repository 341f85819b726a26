//! Server-push update notification

pub mod broadcaster;

pub use broadcaster::UpdateBroadcaster;
