use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::SubscriberId;
use crate::notifier::Messenger;
use crate::state::SubscriberRegistry;

/// Outcome of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
    /// Recipients dropped from the registry because they are unreachable
    pub removed: Vec<SubscriberId>,
}

/// Sends one message to many subscribers, one at a time.
#[derive(Clone)]
pub struct Dispatcher {
    messenger: Arc<dyn Messenger>,
    registry: Arc<SubscriberRegistry>,
}

impl Dispatcher {
    pub fn new(messenger: Arc<dyn Messenger>, registry: Arc<SubscriberRegistry>) -> Self {
        Self {
            messenger,
            registry,
        }
    }

    /// Deliver `message` to every recipient in `recipients`.
    ///
    /// A failure never stops the loop. Permanently unreachable recipients
    /// are unsubscribed; transient failures are only logged.
    pub async fn dispatch(&self, message: &str, recipients: &[SubscriberId]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for &id in recipients {
            match self.messenger.send_message(id, message).await {
                Ok(()) => report.delivered += 1,
                Err(e) if e.is_permanent() => {
                    report.failed += 1;
                    if self.registry.remove(id) {
                        info!("Unsubscribed {} after permanent delivery failure: {}", id, e);
                        report.removed.push(id);
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("Failed to deliver to {}: {}", id, e);
                }
            }
        }

        report
    }
}
