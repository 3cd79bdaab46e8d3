//! Service configuration.
//!
//! Configuration is read from `~/.config/matchday/config.toml` (or the path
//! passed with `--config`) and then overridden by environment variables.
//! If the default file doesn't exist, a commented default is created.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::extractor::ExtractorConfig;

/// Token value shipped in templates; treated the same as a missing token.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

/// Upper bound for `check_interval_hours` (one year).
pub const MAX_CHECK_INTERVAL_HOURS: u64 = 24 * 365;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Events page to poll
    pub source_url: String,
    /// Scheduler period in hours
    pub check_interval_hours: u64,
    /// Preferred time of the morning check. Informational only.
    pub first_check_time: String,
    /// Kept for compatibility with older deployments; not used.
    pub max_retry_attempts: u32,
    /// Page fetch timeout in seconds
    pub http_timeout: u64,
    /// Port of the keepalive HTTP server
    pub web_server_port: u16,
    /// User-Agent sent with page fetches
    pub user_agent: String,
    pub extractor: ExtractorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            source_url: "https://veb-arena.com/events".to_string(),
            check_interval_hours: 1,
            first_check_time: "09:00".to_string(),
            max_retry_attempts: 3,
            http_timeout: 30,
            web_server_port: 8080,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// A missing default file is created with comments. A missing explicit
    /// file is an error. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::default_config_path()?;
                if !p.exists() {
                    Self::create_default_config(&p)?;
                    return Ok(Self::default());
                }
                p
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/matchday/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("matchday").join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("BOT_TOKEN") {
            self.bot_token = token;
        }
        if let Some(url) = lookup("SOURCE_URL") {
            self.source_url = url;
        }
        if let Some(v) = lookup("CHECK_INTERVAL_HOURS") {
            self.check_interval_hours = parse_var("CHECK_INTERVAL_HOURS", &v)?;
        }
        if let Some(v) = lookup("FIRST_CHECK_TIME") {
            self.first_check_time = v;
        }
        if let Some(v) = lookup("MAX_RETRY_ATTEMPTS") {
            self.max_retry_attempts = parse_var("MAX_RETRY_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("HTTP_TIMEOUT") {
            self.http_timeout = parse_var("HTTP_TIMEOUT", &v)?;
        }
        // PORT is what most hosting platforms inject
        if let Some(v) = lookup("WEB_SERVER_PORT").or_else(|| lookup("PORT")) {
            self.web_server_port = parse_var("WEB_SERVER_PORT", &v)?;
        }
        Ok(())
    }

    /// Check everything the long-running bot needs before startup.
    pub fn validate_for_bot(&self) -> Result<(), ConfigError> {
        let token = self.bot_token.trim();
        if token.is_empty() || token == PLACEHOLDER_TOKEN {
            return Err(ConfigError::MissingToken);
        }
        self.source()?;
        self.check_interval_secs()?;
        Ok(())
    }

    /// The parsed source URL.
    pub fn source(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.source_url).map_err(|_| ConfigError::InvalidValue {
            key: "SOURCE_URL".to_string(),
            value: self.source_url.clone(),
        })
    }

    /// Check interval in seconds. Zero and anything past a year are rejected.
    pub fn check_interval_secs(&self) -> Result<u64, ConfigError> {
        let hours = self.check_interval_hours;
        if hours == 0 || hours > MAX_CHECK_INTERVAL_HOURS {
            return Err(ConfigError::InvalidValue {
                key: "CHECK_INTERVAL_HOURS".to_string(),
                value: hours.to_string(),
            });
        }
        Ok(hours * 3600)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# matchday configuration
#
# Every top-level value can also be set through the environment:
# BOT_TOKEN, SOURCE_URL, CHECK_INTERVAL_HOURS, FIRST_CHECK_TIME,
# MAX_RETRY_ATTEMPTS, HTTP_TIMEOUT, WEB_SERVER_PORT (or PORT).

# Telegram bot token from @BotFather
bot_token = ""

# Events page to poll
source_url = "https://veb-arena.com/events"

# How often to check the page, in hours
check_interval_hours = 1

# Preferred morning check time (informational)
first_check_time = "09:00"

# Unused, kept for older deployments
max_retry_attempts = 3

# Page fetch timeout in seconds
http_timeout = 30

# Keepalive HTTP server port
web_server_port = 8080

[extractor]
# Marker that identifies the home team's matches on the page
home_team = "ЦСКА"

# Characters of surrounding text inspected around each date
context_chars = 100

# Title used when no opponent is recognised
generic_title = "Матч ЦСКА"

# Title used when the home team is not mentioned at all
venue_title = "Мероприятие на ВЭБ Арене"

# Opponents, checked in this order; the first one found wins
opponents = [
    "Акрон",
    "Краснодар",
    "Балтика",
    "Спартак",
    "Крылья Советов",
    "Пари Нижний Новгород",
    "Оренбург",
    "Динамо",
    "Динамо Махачкала",
    "Сочи",
    "Ростов",
    "Зенит",
    "Локомотив",
]
"##
        .to_string()
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Bot token is not set (use BOT_TOKEN or bot_token in the config file)")]
    MissingToken,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
