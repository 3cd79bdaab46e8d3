//! # Matchday
//!
//! Tells subscribers, over Telegram, on the days the arena hosts a home
//! match (alcohol sales are restricted nearby on those days).
//!
//! ## Architecture
//!
//! ```text
//! Scheduler tick → Fetcher → Extractor → today filter → ledger → Dispatcher → Messenger
//! ```
//!
//! - [`fetcher`]: HTTP page fetching
//! - [`extractor`]: heuristic event extraction from page text
//! - [`state`]: subscribers, notified dates, status
//! - [`scheduler`]: the recurring check-and-notify loop
//! - [`notifier`]: message rendering and delivery
//! - [`bot`]: chat commands
//! - [`server`]: keepalive HTTP endpoints
//!
//! ## Quick Start
//!
//! ```bash
//! # See what the page says today
//! matchday check
//!
//! # Run the bot
//! BOT_TOKEN=123:abc matchday run
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the fetcher,
/// extractor, subscriber registry and clock.
pub mod app;

/// Chat command parsing and handling, plus the Telegram polling loop.
pub mod bot;

/// Command-line interface using clap.
///
/// - `run` - run the bot
/// - `check [--all]` - one-off check printed to stdout
/// - `config-path` - show the default config location
pub mod cli;

/// Configuration from `~/.config/matchday/config.toml` and the environment.
pub mod config;

/// Core domain models.
///
/// - [`EventRecord`](domain::EventRecord): one extracted match
/// - [`SubscriberId`](domain::SubscriberId): chat identity
pub mod domain;

/// Event extraction from the venue page.
pub mod extractor;

/// HTTP fetching.
///
/// - [`PageFetcher`](fetcher::PageFetcher): async trait for page retrieval
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Message rendering, fan-out delivery and the Telegram client.
pub mod notifier;

/// Recurring check-and-notify loop.
pub mod scheduler;

/// Keepalive HTTP server.
pub mod server;

/// In-memory service state.
pub mod state;
