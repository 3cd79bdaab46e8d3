//! Recurring check-and-notify loop.
//!
//! The scheduler owns the notified-dates ledger and is the only place it is
//! touched. Cycles run inline on one task, so they never overlap:
//!
//! ```text
//! timer tick / RunNow ─→ fetch → extract → today filter → ledger check → dispatch
//! ```

mod clock;
mod config;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SchedulerConfig;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::app::AppContext;
use crate::domain::EventRecord;
use crate::notifier::{render_notification, DispatchReport, Dispatcher};
use crate::state::NotifiedDates;

/// What a single cycle decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing on today (or the page could not be read)
    NoEvents,
    /// Today's notification already went out
    AlreadyNotified,
    /// Events found but nobody to tell. Today stays unmarked.
    NoSubscribers { events: Vec<EventRecord> },
    Notified {
        date: NaiveDate,
        report: DispatchReport,
    },
    /// The cycle panicked; the loop carries on
    Aborted,
}

/// Message type for the scheduler loop
#[derive(Debug)]
pub enum SchedulerMessage {
    /// Run a cycle now and report its outcome
    #[cfg(test)]
    RunNow(tokio::sync::oneshot::Sender<CycleOutcome>),
    /// Stop the loop
    Shutdown,
}

/// Handle to send messages to a running scheduler
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<SchedulerMessage>,
}

impl SchedulerHandle {
    /// Trigger a cycle and wait for it. `None` if the scheduler is gone.
    #[cfg(test)]
    pub async fn run_now(&self) -> Option<CycleOutcome> {
        let (reply, rx) = tokio::sync::oneshot::channel();
        if let Err(e) = self.tx.send(SchedulerMessage::RunNow(reply)).await {
            warn!("Failed to reach scheduler: {}", e);
            return None;
        }
        rx.await.ok()
    }

    pub async fn shutdown(&self) {
        if self.tx.send(SchedulerMessage::Shutdown).await.is_err() {
            warn!("Scheduler already stopped");
        }
    }
}

pub struct Scheduler {
    ctx: Arc<AppContext>,
    dispatcher: Dispatcher,
    config: SchedulerConfig,
    ledger: NotifiedDates,
}

impl Scheduler {
    pub fn new(ctx: Arc<AppContext>, dispatcher: Dispatcher, config: SchedulerConfig) -> Self {
        Self {
            ctx,
            dispatcher,
            config,
            ledger: NotifiedDates::new(),
        }
    }

    #[cfg(test)]
    pub fn ledger(&self) -> &NotifiedDates {
        &self.ledger
    }

    /// One fetch → filter → decide → notify pass.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let today = self.ctx.today();
        let events = self.ctx.events_on(today).await;

        if events.is_empty() {
            info!("No events on {}", today);
            return CycleOutcome::NoEvents;
        }

        if self.ledger.contains(today) {
            info!("Events found on {}, notification already sent", today);
            return CycleOutcome::AlreadyNotified;
        }

        let recipients = self.ctx.registry.snapshot();
        if recipients.is_empty() {
            // Leave today unmarked so someone subscribing later still hears about it
            info!("Events found on {}, but there are no subscribers", today);
            return CycleOutcome::NoSubscribers { events };
        }

        let message = render_notification(&events);
        let report = self.dispatcher.dispatch(&message, &recipients).await;

        self.ledger.insert(today);
        self.ledger.prune(today);

        info!(
            "Notified {} of {} subscribers about {} event(s) on {}",
            report.delivered,
            recipients.len(),
            events.len(),
            today
        );

        CycleOutcome::Notified {
            date: today,
            report,
        }
    }

    async fn guarded_cycle(&mut self) -> CycleOutcome {
        match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Scheduler cycle panicked; continuing on schedule");
                CycleOutcome::Aborted
            }
        }
    }

    /// Run the scheduler loop until shutdown or until every handle is dropped.
    pub async fn run(mut self, mut rx: mpsc::Receiver<SchedulerMessage>) {
        info!(
            "Scheduler started (interval: {})",
            SchedulerConfig::format_interval(self.config.interval_secs)
        );

        if self.config.check_on_start {
            self.guarded_cycle().await;
        }

        // First tick one full period from now
        let period = self.config.interval();
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = timer.tick() => {
                    self.guarded_cycle().await;
                }
                msg = rx.recv() => match msg {
                    #[cfg(test)]
                    Some(SchedulerMessage::RunNow(reply)) => {
                        let outcome = self.guarded_cycle().await;
                        let _ = reply.send(outcome);
                    }
                    Some(SchedulerMessage::Shutdown) | None => break,
                },
            }
        }

        info!("Scheduler shutting down");
    }

    /// Spawn the scheduler as a tokio task
    pub fn spawn(self) -> (SchedulerHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(self.run(rx));
        (SchedulerHandle { tx }, task)
    }
}
