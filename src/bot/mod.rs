//! Chat commands.
//!
//! - `/start`, `/help` - usage texts
//! - `/check` - run a check right now and reply with today's events
//! - `/subscribe`, `/unsubscribe` - manage daily notifications
//! - `/status` - subscriber count and last check time

mod polling;

pub use polling::{handle_update, run_polling};

use std::sync::Arc;

use crate::app::AppContext;
use crate::domain::SubscriberId;
use crate::notifier::message::ALERT_HEADER;
use crate::notifier::{event_lines, DeliveryError, Messenger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Check,
    Subscribe,
    Unsubscribe,
    Status,
}

impl Command {
    /// Parse the first word of a message, accepting `/cmd@BotName` forms.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let name = word.split('@').next()?;

        match name.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "check" => Some(Command::Check),
            "subscribe" => Some(Command::Subscribe),
            "unsubscribe" => Some(Command::Unsubscribe),
            "status" => Some(Command::Status),
            _ => None,
        }
    }
}

const WELCOME: &str = "🏟️ Добро пожаловать в бот ВЭБ Арены!\n\n\
Я помогу вам отслеживать мероприятия на стадионе и напомню, когда нельзя покупать алкоголь.\n\n\
📝 Доступные команды:\n\
/check - проверить мероприятия сегодня\n\
/subscribe - подписаться на уведомления\n\
/unsubscribe - отписаться от уведомлений\n\
/status - статус работы бота\n\
/help - показать справку";

const HELP: &str = "🤖 Справка по боту ВЭБ Арены\n\n\
Этот бот проверяет расписание мероприятий на ВЭБ Арене и уведомляет о днях, \
когда действует запрет на продажу алкоголя.\n\n\
📋 Команды:\n\
• /start - запустить бота\n\
• /check - проверить мероприятия на сегодня\n\
• /subscribe - подписаться на уведомления\n\
• /unsubscribe - отписаться от уведомлений\n\
• /status - показать статус работы бота\n\
• /help - показать эту справку\n\n\
🔔 Как работают уведомления:\n\
• Приходят ТОЛЬКО в дни мероприятий\n\
• Один раз в день\n\
• Если событий нет - уведомлений нет\n\n\
🔍 Бот проверяет сайт автоматически.";

const CHECKING: &str = "🔍 Проверяю мероприятия на сегодня...";
const NO_EVENTS: &str = "✅ Сегодня мероприятий нет. Продажа алкоголя разрешена.";

const SUBSCRIBED: &str = "✅ Вы подписались на уведомления!\n\n\
🔔 Я буду присылать уведомления ТОЛЬКО в дни, когда на ВЭБ Арене проходят мероприятия.\n\n\
📅 Уведомление приходит один раз в день.\n\
🚫 В эти дни действует запрет на продажу алкоголя.\n\n\
💡 Если мероприятий нет - уведомлений не будет!";
const ALREADY_SUBSCRIBED: &str = "ℹ️ Вы уже подписаны на уведомления.";
const UNSUBSCRIBED: &str = "❌ Вы отписались от уведомлений.";
const NOT_SUBSCRIBED: &str = "ℹ️ Вы не были подписаны на уведомления.";

/// Answers chat commands on behalf of the service.
#[derive(Clone)]
pub struct CommandHandler {
    ctx: Arc<AppContext>,
    web_port: u16,
}

impl CommandHandler {
    pub fn new(ctx: Arc<AppContext>, web_port: u16) -> Self {
        Self { ctx, web_port }
    }

    /// Handle `command` from `chat`, replying through `messenger`.
    pub async fn handle(
        &self,
        messenger: &dyn Messenger,
        chat: SubscriberId,
        command: Command,
    ) -> Result<(), DeliveryError> {
        match command {
            Command::Start => messenger.send_message(chat, WELCOME).await,
            Command::Help => messenger.send_message(chat, HELP).await,
            Command::Check => {
                messenger.send_message(chat, CHECKING).await?;
                let events = self.ctx.check_today().await;
                let reply = if events.is_empty() {
                    NO_EVENTS.to_string()
                } else {
                    format!("{ALERT_HEADER}{}", event_lines(&events))
                };
                messenger.send_message(chat, &reply).await
            }
            Command::Subscribe => {
                let reply = if self.ctx.subscribe(chat) {
                    SUBSCRIBED
                } else {
                    ALREADY_SUBSCRIBED
                };
                messenger.send_message(chat, reply).await
            }
            Command::Unsubscribe => {
                let reply = if self.ctx.unsubscribe(chat) {
                    UNSUBSCRIBED
                } else {
                    NOT_SUBSCRIBED
                };
                messenger.send_message(chat, reply).await
            }
            Command::Status => messenger.send_message(chat, &self.status_text()).await,
        }
    }

    fn status_text(&self) -> String {
        let status = self.ctx.status();
        let last_check = status
            .last_check
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "ещё не было".to_string());

        format!(
            "📊 Статус бота:\n\n\
             🔗 Подписчиков: {}\n\
             ⏰ Последняя проверка: {}\n\
             🌐 Веб-сервер: активен на порту {}\n\
             ✅ Бот работает штатно",
            status.subscriber_count, last_check, self.web_port
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::extractor::EventExtractor;
    use crate::fetcher::testing::StaticFetcher;
    use crate::notifier::testing::FakeMessenger;
    use crate::scheduler::FixedClock;

    fn handler(page: &str) -> (Arc<AppContext>, CommandHandler) {
        let now = NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let ctx = Arc::new(AppContext::with_parts(
            Arc::new(StaticFetcher::new(page)),
            EventExtractor::default(),
            Arc::new(FixedClock::new(now)),
            "https://example.com/events",
        ));
        (ctx.clone(), CommandHandler::new(ctx, 8080))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/check"), Some(Command::Check));
        assert_eq!(Command::parse("  /subscribe now"), Some(Command::Subscribe));
        assert_eq!(Command::parse("/status@ArenaBot"), Some(Command::Status));
        assert_eq!(Command::parse("/HELP"), Some(Command::Help));
        assert_eq!(Command::parse("/unsubscribe"), Some(Command::Unsubscribe));
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("check"), None);
        assert_eq!(Command::parse("/weather"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[tokio::test]
    async fn test_subscribe_and_unsubscribe() {
        let (ctx, handler) = handler("");
        let messenger = FakeMessenger::default();
        let chat = SubscriberId(42);

        assert_ok!(handler.handle(&messenger, chat, Command::Subscribe).await);
        assert_ok!(handler.handle(&messenger, chat, Command::Subscribe).await);
        assert!(ctx.registry.contains(chat));

        assert_ok!(handler.handle(&messenger, chat, Command::Unsubscribe).await);
        assert_ok!(handler.handle(&messenger, chat, Command::Unsubscribe).await);
        assert!(!ctx.registry.contains(chat));

        let replies: Vec<String> = messenger.sent().into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            replies,
            vec![SUBSCRIBED, ALREADY_SUBSCRIBED, UNSUBSCRIBED, NOT_SUBSCRIBED]
        );
    }

    #[tokio::test]
    async fn test_check_lists_todays_events() {
        let (_, handler) = handler("15 ср ЦСКА — Зенит 19:00");
        let messenger = FakeMessenger::default();

        assert_ok!(
            handler
                .handle(&messenger, SubscriberId(1), Command::Check)
                .await
        );

        let sent = messenger.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, CHECKING);
        assert!(sent[1].1.starts_with(ALERT_HEADER));
        assert!(sent[1].1.contains("• ЦСКА — Зенит в 19:00"));
    }

    #[tokio::test]
    async fn test_check_without_events() {
        let (_, handler) = handler("20 пн ЦСКА — Зенит 19:00");
        let messenger = FakeMessenger::default();

        assert_ok!(
            handler
                .handle(&messenger, SubscriberId(1), Command::Check)
                .await
        );
        assert_eq!(messenger.sent()[1].1, NO_EVENTS);
    }

    #[tokio::test]
    async fn test_status_reports_counts() {
        let (ctx, handler) = handler("");
        ctx.subscribe(SubscriberId(1));
        ctx.subscribe(SubscriberId(2));
        let messenger = FakeMessenger::default();

        assert_ok!(
            handler
                .handle(&messenger, SubscriberId(1), Command::Status)
                .await
        );

        let text = &messenger.sent()[0].1;
        assert!(text.contains("Подписчиков: 2"));
        assert!(text.contains("ещё не было"));
        assert!(text.contains("порту 8080"));
    }

    #[tokio::test]
    async fn test_reply_failure_is_reported() {
        let (_, handler) = handler("");
        let messenger = FakeMessenger::default();
        messenger.fail_for(SubscriberId(9), DeliveryError::Transient("timeout".into()));

        assert_err!(handler.handle(&messenger, SubscriberId(9), Command::Help).await);
    }
}
