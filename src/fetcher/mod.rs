pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;

/// Source of raw page text.
///
/// Transport failures, timeouts and non-2xx responses all surface as errors;
/// callers treat them as "nothing found this time".
#[async_trait]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;
    use crate::app::MatchdayError;

    /// Serves a fixed page, or fails when no page is set.
    pub struct StaticFetcher {
        page: Mutex<Option<String>>,
    }

    impl StaticFetcher {
        pub fn new(page: &str) -> Self {
            Self {
                page: Mutex::new(Some(page.to_string())),
            }
        }

        pub fn set_page(&self, page: &str) {
            *self.page.lock().unwrap() = Some(page.to_string());
        }

        pub fn fail(&self) {
            *self.page.lock().unwrap() = None;
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            self.page
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| MatchdayError::Other("connection refused".into()))
        }
    }
}
