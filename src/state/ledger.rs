use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

/// Days a notified date is remembered for.
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

/// Dates for which the daily notification has already gone out.
#[derive(Debug, Clone)]
pub struct NotifiedDates {
    dates: BTreeSet<NaiveDate>,
    retention: Days,
}

impl Default for NotifiedDates {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION_DAYS)
    }
}

impl NotifiedDates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(days: u64) -> Self {
        Self {
            dates: BTreeSet::new(),
            retention: Days::new(days),
        }
    }

    /// Returns `true` if the date was not already recorded.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Forget dates more than the retention period before `today`.
    /// Returns how many were dropped.
    pub fn prune(&mut self, today: NaiveDate) -> usize {
        let Some(cutoff) = today.checked_sub_days(self.retention) else {
            return 0;
        };
        let before = self.dates.len();
        self.dates.retain(|d| *d >= cutoff);
        before - self.dates.len()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
