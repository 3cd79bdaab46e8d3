//! Event extraction from the venue's events page.
//!
//! The page has no usable structure, so events are recognised heuristically:
//!
//! ```text
//! raw HTML → page text → date/time matches → context window → marker filter → title
//! ```
//!
//! A match is `<day> <weekday> … <HH:MM>` on a single line. The month is not
//! printed, so it is inferred from the reference date: the current month, or
//! the next one if that day has already passed.

mod config;
mod text;

pub use config::ExtractorConfig;
pub use text::page_text;

use std::sync::LazyLock;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::debug;

use crate::domain::EventRecord;

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]{1,2})\s*(вс|пн|вт|ср|чт|пт|сб).*?([0-9]{1,2}:[0-9]{2})")
        .expect("date pattern is valid")
});

/// Turns page text into [`EventRecord`]s.
#[derive(Debug, Clone)]
pub struct EventExtractor {
    config: ExtractorConfig,
}

impl Default for EventExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl EventExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract events from a raw (HTML or plain text) page body.
    pub fn extract(&self, raw: &str, reference: NaiveDateTime) -> Vec<EventRecord> {
        self.extract_text(&page_text(raw), reference)
    }

    /// Extract events from already flattened text, in scan order.
    pub fn extract_text(&self, text: &str, reference: NaiveDateTime) -> Vec<EventRecord> {
        let today = reference.date();
        let mut events = Vec::new();

        for caps in DATE_TIME.captures_iter(text) {
            let (Some(whole), Some(day), Some(time)) = (caps.get(0), caps.get(1), caps.get(3))
            else {
                continue;
            };

            let Some(date) = day
                .as_str()
                .parse::<u32>()
                .ok()
                .and_then(|d| resolve_date(d, today))
            else {
                debug!("Skipping invalid day {:?} near {:?}", day.as_str(), whole.as_str());
                continue;
            };

            let context = context_window(text, whole.start(), whole.end(), self.config.context_chars);
            if !context.contains(&self.config.home_team) {
                continue;
            }

            events.push(EventRecord::new(
                self.resolve_title(context),
                date,
                time.as_str(),
            ));
        }

        events
    }

    /// Pick a title from the text surrounding a match.
    pub fn resolve_title(&self, context: &str) -> String {
        if let Some(opponent) = self
            .config
            .opponents
            .iter()
            .find(|team| context.contains(team.as_str()))
        {
            return format!("{} — {}", self.config.home_team, opponent);
        }

        if context.contains(&self.config.home_team) {
            return self.config.generic_title.clone();
        }

        self.config.venue_title.clone()
    }
}

/// Place `day` in the current month of `today`, or the next month if that
/// date is already behind us. Returns `None` when the day does not exist in
/// the chosen month.
pub fn resolve_date(day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let candidate = NaiveDate::from_ymd_opt(today.year(), today.month(), day)?;
    if candidate >= today {
        return Some(candidate);
    }

    let next = today.with_day(1)?.checked_add_months(Months::new(1))?;
    NaiveDate::from_ymd_opt(next.year(), next.month(), day)
}

/// Slice of `text` reaching `chars` characters before `start` and after `end`.
fn context_window(text: &str, start: usize, end: usize, chars: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}
