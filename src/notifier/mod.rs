//! Notification delivery.
//!
//! ```text
//! events → render → Dispatcher → Messenger (per subscriber) → registry pruning
//! ```

pub mod dispatcher;
pub mod message;
pub mod telegram;

pub use dispatcher::{DispatchReport, Dispatcher};
pub use message::{event_lines, render_notification};
pub use telegram::TelegramClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::SubscriberId;

/// Why a single message did not reach its recipient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The recipient blocked the bot or no longer exists. Retrying is pointless.
    #[error("recipient unreachable: {0}")]
    PermanentlyUnreachable(String),

    #[error("transient failure: {0}")]
    Transient(String),
}

impl DeliveryError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, DeliveryError::PermanentlyUnreachable(_))
    }
}

/// Outbound side of a chat channel.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(
        &self,
        chat_id: SubscriberId,
        text: &str,
    ) -> std::result::Result<(), DeliveryError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Records sent messages; recipients can be scripted to fail.
    #[derive(Default)]
    pub struct FakeMessenger {
        pub sent: Mutex<Vec<(SubscriberId, String)>>,
        pub failures: Mutex<HashMap<SubscriberId, DeliveryError>>,
    }

    impl FakeMessenger {
        pub fn fail_for(&self, id: SubscriberId, error: DeliveryError) {
            self.failures.lock().unwrap().insert(id, error);
        }

        pub fn sent(&self) -> Vec<(SubscriberId, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Messenger for FakeMessenger {
        async fn send_message(
            &self,
            chat_id: SubscriberId,
            text: &str,
        ) -> std::result::Result<(), DeliveryError> {
            if let Some(err) = self.failures.lock().unwrap().get(&chat_id) {
                return Err(err.clone());
            }
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }
    }
}
