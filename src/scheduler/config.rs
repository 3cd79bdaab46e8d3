use std::time::Duration;

use crate::config::{Config, ConfigError, MAX_CHECK_INTERVAL_HOURS};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Check interval in seconds (default: 3600 = 1 hour)
    pub interval_secs: u64,
    /// Whether to run a check immediately on start
    pub check_on_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            check_on_start: true,
        }
    }
}

impl SchedulerConfig {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            interval_secs: config.check_interval_secs()?,
            ..Default::default()
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> Result<u64, ConfigError> {
        let s = s.trim().to_lowercase();
        let invalid = || ConfigError::InvalidValue {
            key: "interval".to_string(),
            value: s.clone(),
        };

        let (digits, unit) = match s.char_indices().last() {
            Some((i, 'h')) => (&s[..i], 3600),
            Some((i, 'm')) => (&s[..i], 60),
            Some((i, 'd')) => (&s[..i], 86400),
            Some((i, 's')) => (&s[..i], 1),
            _ => (s.as_str(), 1),
        };

        let secs = digits
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(unit))
            .ok_or_else(invalid)?;

        if secs == 0 || secs > MAX_CHECK_INTERVAL_HOURS * 3600 {
            return Err(invalid());
        }
        Ok(secs)
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs.is_multiple_of(86400) {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}
