use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::bot::{Command, CommandHandler};
use crate::domain::SubscriberId;
use crate::notifier::telegram::{TelegramClient, Update, LONG_POLL_SECS};
use crate::notifier::Messenger;

const INITIAL_BACKOFF_SECS: u64 = 5;
const MAX_BACKOFF_SECS: u64 = 60;

/// Answer one update. Non-command messages are ignored.
pub async fn handle_update(handler: &CommandHandler, messenger: &dyn Messenger, update: &Update) {
    let Some(message) = &update.message else {
        return;
    };
    let Some(command) = message.text.as_deref().and_then(Command::parse) else {
        return;
    };

    let chat = SubscriberId(message.chat.id);
    debug!("Command {:?} from {}", command, chat);

    if let Err(e) = handler.handle(messenger, chat, command).await {
        warn!("Failed to reply to {}: {}", chat, e);
    }
}

/// Long-poll Telegram for commands until the task is dropped.
pub async fn run_polling(client: Arc<TelegramClient>, handler: CommandHandler) {
    info!("Listening for chat commands");

    let mut offset: Option<i64> = None;
    let mut backoff_secs = INITIAL_BACKOFF_SECS;

    loop {
        match client.get_updates(offset, LONG_POLL_SECS).await {
            Ok(updates) => {
                backoff_secs = INITIAL_BACKOFF_SECS;
                for update in updates {
                    offset = Some(update.update_id + 1);
                    // Commands run in turn; /check may hold the loop for one page fetch
                    handle_update(&handler, &*client, &update).await;
                }
            }
            Err(e) => {
                error!("Failed to get updates: {}, retrying in {}s", e, backoff_secs);
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
            }
        }
    }
}
