use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};

/// Process start and last completed check, for status reporting.
#[derive(Debug)]
pub struct StatusTracker {
    started_at: DateTime<Local>,
    last_check: Mutex<Option<DateTime<Local>>>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl StatusTracker {
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            last_check: Mutex::new(None),
        }
    }

    pub fn record_check(&self, at: DateTime<Local>) {
        *self.last_check.lock().unwrap_or_else(PoisonError::into_inner) = Some(at);
    }

    pub fn last_check(&self) -> Option<DateTime<Local>> {
        *self.last_check.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_records_last_check() {
        let start = Local.with_ymd_and_hms(2024, 5, 15, 8, 0, 0).unwrap();
        let tracker = StatusTracker::new(start);
        assert!(tracker.last_check().is_none());

        let check = Local.with_ymd_and_hms(2024, 5, 15, 9, 0, 0).unwrap();
        tracker.record_check(check);
        assert_eq!(tracker.last_check(), Some(check));
        assert_eq!(tracker.started_at(), start);
    }
}
