use crate::domain::EventRecord;

pub const ALERT_HEADER: &str = "🚫 ВНИМАНИЕ! Сегодня запрещена продажа алкоголя!\n\n📅 Мероприятия на сегодня:\n";
pub const NOTIFICATION_FOOTER: &str = "\n💡 Это уведомление отправляется только в дни мероприятий.";

/// One bullet line per event: `• <title> в <time>`.
pub fn event_lines(events: &[EventRecord]) -> String {
    events
        .iter()
        .map(|e| format!("• {} в {}\n", e.title, e.time))
        .collect()
}

/// The daily broadcast sent to subscribers.
pub fn render_notification(events: &[EventRecord]) -> String {
    format!("{ALERT_HEADER}{}{NOTIFICATION_FOOTER}", event_lines(events))
}
