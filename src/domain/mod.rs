pub mod event;
pub mod subscriber;

pub use event::EventRecord;
pub use subscriber::SubscriberId;
