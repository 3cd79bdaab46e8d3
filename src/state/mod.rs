//! In-memory service state. Nothing here survives a restart.

pub mod ledger;
pub mod registry;
pub mod status;

pub use ledger::{NotifiedDates, DEFAULT_RETENTION_DAYS};
pub use registry::SubscriberRegistry;
pub use status::StatusTracker;
