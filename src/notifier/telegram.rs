//! Minimal Telegram Bot API client: long-poll updates in, text messages out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::app::{MatchdayError, Result};
use crate::domain::SubscriberId;
use crate::notifier::{DeliveryError, Messenger};

pub const API_URL: &str = "https://api.telegram.org";

/// Seconds a `getUpdates` call may be held open by the server.
pub const LONG_POLL_SECS: u64 = 30;

const PERMANENT_MARKERS: &[&str] = &[
    "bot was blocked",
    "bot was kicked",
    "user is deactivated",
    "chat not found",
];

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_api_url(API_URL, token)
    }

    pub fn with_api_url(api_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_SECS + 15))
            .user_agent(concat!("matchday/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> std::result::Result<ApiResponse<T>, reqwest::Error> {
        self.client
            .post(format!("{}/{}", self.base_url, method))
            .json(&body)
            .send()
            .await?
            .json::<ApiResponse<T>>()
            .await
    }

    /// Fetch pending updates, waiting up to `timeout_secs` for new ones.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let response: ApiResponse<Vec<Update>> = self
            .call(
                "getUpdates",
                json!({
                    "offset": offset,
                    "timeout": timeout_secs,
                    "allowed_updates": ["message"],
                }),
            )
            .await?;

        if !response.ok {
            return Err(MatchdayError::Other(format!(
                "getUpdates failed ({}): {}",
                response.error_code.unwrap_or_default(),
                response.description.unwrap_or_default()
            )));
        }

        Ok(response.result.unwrap_or_default())
    }

    /// Identity of the bot behind the token.
    pub async fn get_me(&self) -> Result<User> {
        let response: ApiResponse<User> = self.call("getMe", json!({})).await?;
        match response.result {
            Some(user) if response.ok => Ok(user),
            _ => Err(MatchdayError::Other(format!(
                "getMe failed: {}",
                response.description.unwrap_or_default()
            ))),
        }
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(
        &self,
        chat_id: SubscriberId,
        text: &str,
    ) -> std::result::Result<(), DeliveryError> {
        let response: ApiResponse<serde_json::Value> = self
            .call(
                "sendMessage",
                json!({ "chat_id": chat_id.as_i64(), "text": text }),
            )
            .await
            .map_err(|e| DeliveryError::Transient(e.to_string()))?;

        if response.ok {
            return Ok(());
        }

        Err(classify_failure(
            response.error_code,
            response.description.as_deref().unwrap_or(""),
        ))
    }
}

/// Map an API error to a delivery outcome.
pub fn classify_failure(error_code: Option<i64>, description: &str) -> DeliveryError {
    let lower = description.to_lowercase();
    let detail = format!("{} {}", error_code.unwrap_or_default(), description);

    if error_code == Some(403) || PERMANENT_MARKERS.iter().any(|m| lower.contains(m)) {
        DeliveryError::PermanentlyUnreachable(detail)
    } else {
        DeliveryError::Transient(detail)
    }
}
