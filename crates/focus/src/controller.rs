//! Timer controller
//!
//! Runs a `Timer` on one cooperative loop: inputs (user commands, lifecycle
//! events) arrive on a channel, ticks come from a 1-second interval, and a
//! finished session is written to the `SessionStore`.
//!
//! Ordering: inputs are polled before the ticker. If the app leaves the
//! foreground in the same turn the final tick becomes due, the distraction
//! wins, the timer pauses, and the due tick is dropped with the ticker.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{error, info};

use crate::store::SessionStore;
use crate::timer::{Timer, TimerEvent, Transition};

/// What woke the loop
#[derive(Debug)]
pub enum Step<T> {
    /// Something arrived on the input channel; the caller decides what it means
    Input(T),
    /// A tick was applied to the timer
    Tick(Transition),
}

/// The periodic tick; dropping it cancels any pending tick
struct Ticker {
    interval: Interval,
}

impl Ticker {
    fn start(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(t) => {
            t.interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

pub struct TimerController {
    timer: Timer,
    store: SessionStore,
    period: Duration,
    ticker: Option<Ticker>,
}

impl TimerController {
    pub fn new(timer: Timer, store: SessionStore) -> Self {
        Self {
            timer,
            store,
            period: Duration::from_secs(1),
            ticker: None,
        }
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Whether a tick is currently scheduled
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Apply an event, persisting the session if it finished
    pub fn dispatch(&mut self, event: TimerEvent) -> Transition {
        let transition = self.timer.apply(event);

        if !self.timer.is_running() {
            self.ticker = None;
        }

        if let Transition::Finished(summary) = transition {
            match self.store.save(summary.to_new_session()) {
                Ok(record) => info!(
                    id = %record.id,
                    category = %record.category_id,
                    seconds = record.duration_seconds,
                    completed = summary.completed,
                    "Session recorded"
                ),
                // The summary is still shown; this session is lost from history
                Err(e) => error!("Failed to save session: {}", e),
            }
        }

        transition
    }

    /// Wait for the next input or tick
    ///
    /// Returns `None` once `inputs` is closed; the ticker is dropped with it.
    pub async fn next<T>(&mut self, inputs: &mut mpsc::Receiver<T>) -> Option<Step<T>> {
        if self.timer.is_running() {
            if self.ticker.is_none() {
                self.ticker = Some(Ticker::start(self.period));
            }
        } else {
            self.ticker = None;
        }

        enum Wake<I> {
            Input(Option<I>),
            Tick,
        }

        let wake = {
            let ticker = &mut self.ticker;
            tokio::select! {
                biased;
                input = inputs.recv() => Wake::Input(input),
                _ = next_tick(ticker) => Wake::Tick,
            }
        };

        match wake {
            Wake::Input(Some(input)) => Some(Step::Input(input)),
            Wake::Input(None) => {
                self.ticker = None;
                None
            }
            Wake::Tick => Some(Step::Tick(self.dispatch(TimerEvent::Tick))),
        }
    }
}
