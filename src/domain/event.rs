use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One extracted occurrence on the venue page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub date: NaiveDate,
    /// Kick-off time as printed on the page, e.g. `"19:00"`.
    pub time: String,
}

impl EventRecord {
    pub fn new(title: impl Into<String>, date: NaiveDate, time: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date,
            time: time.into(),
        }
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }
}

/// Keep only the events that fall on `day`, preserving page order.
pub fn events_on(events: &[EventRecord], day: NaiveDate) -> Vec<EventRecord> {
    events.iter().filter(|e| e.is_on(day)).cloned().collect()
}
