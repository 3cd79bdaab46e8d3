use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, error};

use crate::app::error::Result;
use crate::config::Config;
use crate::domain::{event::events_on, EventRecord, SubscriberId};
use crate::extractor::EventExtractor;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::scheduler::{Clock, SystemClock};
use crate::state::{StatusTracker, SubscriberRegistry};

/// Snapshot reported by `/status` and the keepalive server.
#[derive(Debug, Clone)]
pub struct Status {
    pub subscriber_count: usize,
    pub last_check: Option<DateTime<Local>>,
    pub started_at: DateTime<Local>,
}

impl Status {
    pub fn uptime_secs(&self, now: DateTime<Local>) -> i64 {
        now.signed_duration_since(self.started_at).num_seconds().max(0)
    }
}

/// Shared services used by the scheduler, the bot and the keepalive server.
pub struct AppContext {
    pub fetcher: Arc<dyn PageFetcher + Send + Sync>,
    pub extractor: EventExtractor,
    pub registry: Arc<SubscriberRegistry>,
    pub status: StatusTracker,
    pub clock: Arc<dyn Clock>,
    pub source_url: String,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self> {
        let source = config.source()?;
        let fetcher: Arc<dyn PageFetcher + Send + Sync> =
            Arc::new(HttpFetcher::new(config.http_timeout(), &config.user_agent)?);

        Ok(Self::with_parts(
            fetcher,
            EventExtractor::new(config.extractor.clone()),
            Arc::new(SystemClock),
            source.as_str(),
        ))
    }

    pub fn with_parts(
        fetcher: Arc<dyn PageFetcher + Send + Sync>,
        extractor: EventExtractor,
        clock: Arc<dyn Clock>,
        source_url: &str,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            registry: Arc::new(SubscriberRegistry::new()),
            status: StatusTracker::default(),
            clock,
            source_url: source_url.to_string(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Fetch the page and extract every event on it.
    pub async fn fetch_events(&self) -> Result<Vec<EventRecord>> {
        let page = self.fetcher.fetch(&self.source_url).await?;
        let events = self.extractor.extract(&page, self.clock.now());
        debug!("Extracted {} event(s) from {}", events.len(), self.source_url);
        Ok(events)
    }

    /// Events on `day`. A failed fetch is logged and yields nothing.
    pub async fn events_on(&self, day: NaiveDate) -> Vec<EventRecord> {
        let result = self.fetch_events().await;
        self.status.record_check(self.clock.now_local());

        match result {
            Ok(events) => events_on(&events, day),
            Err(e) => {
                error!("Failed to get events from {}: {}", self.source_url, e);
                Vec::new()
            }
        }
    }

    /// Today's events, for on-demand checks.
    pub async fn check_today(&self) -> Vec<EventRecord> {
        self.events_on(self.today()).await
    }

    pub fn subscribe(&self, id: SubscriberId) -> bool {
        self.registry.add(id)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.registry.remove(id)
    }

    pub fn status(&self) -> Status {
        Status {
            subscriber_count: self.registry.len(),
            last_check: self.status.last_check(),
            started_at: self.status.started_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::fetcher::testing::StaticFetcher;
    use crate::scheduler::FixedClock;

    fn context(page: &str) -> (Arc<StaticFetcher>, AppContext) {
        let now = NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let fetcher = Arc::new(StaticFetcher::new(page));
        let ctx = AppContext::with_parts(
            fetcher.clone(),
            EventExtractor::default(),
            Arc::new(FixedClock::new(now)),
            "https://example.com/events",
        );
        (fetcher, ctx)
    }

    #[tokio::test]
    async fn test_check_today_filters_to_today() {
        let page = format!("15 ср ЦСКА — Зенит 19:00{}18 сб ЦСКА — Сочи 17:00", "-".repeat(120));
        let (_, ctx) = context(&page);

        let all = ctx.fetch_events().await.unwrap();
        assert_eq!(all.len(), 2);

        let today = ctx.check_today().await;
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].title, "ЦСКА — Зенит");
    }

    #[tokio::test]
    async fn test_check_today_swallows_fetch_errors() {
        let (fetcher, ctx) = context("");
        fetcher.fail();

        assert!(ctx.fetch_events().await.is_err());
        assert!(ctx.check_today().await.is_empty());
        assert!(ctx.status().last_check.is_some());
    }

    #[tokio::test]
    async fn test_last_check_follows_clock() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let clock = Arc::new(FixedClock::new(now));
        let ctx = AppContext::with_parts(
            Arc::new(StaticFetcher::new("")),
            EventExtractor::default(),
            clock.clone(),
            "https://example.com/events",
        );

        ctx.check_today().await;
        assert_eq!(ctx.status().last_check.unwrap().naive_local(), now);

        clock.advance(TimeDelta::minutes(90));
        ctx.check_today().await;
        assert_eq!(
            ctx.status().last_check.unwrap().naive_local(),
            now + TimeDelta::minutes(90)
        );
    }

    #[test]
    fn test_subscription_and_status() {
        let (_, ctx) = context("");
        assert!(ctx.subscribe(SubscriberId(1)));
        assert!(!ctx.subscribe(SubscriberId(1)));
        assert!(ctx.subscribe(SubscriberId(2)));
        assert_eq!(ctx.status().subscriber_count, 2);

        assert!(ctx.unsubscribe(SubscriberId(1)));
        assert!(!ctx.unsubscribe(SubscriberId(1)));
        assert_eq!(ctx.status().subscriber_count, 1);
        assert!(ctx.status().last_check.is_none());
    }

    #[test]
    fn test_uptime() {
        let (_, ctx) = context("");
        let status = ctx.status();
        let later = status.started_at + TimeDelta::seconds(90);
        assert_eq!(status.uptime_secs(later), 90);
        assert_eq!(status.uptime_secs(status.started_at - TimeDelta::seconds(5)), 0);
    }
}
