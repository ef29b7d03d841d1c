//! The once-per-second quiz countdown.
//!
//! The ticker only produces ticks; the session store decides what a tick means.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A cancellable repeating tick.
pub trait Ticker {
    /// Starts ticking. Restarting an already running ticker resets its phase.
    fn start(&mut self);
    /// Cancels the pending tick. Safe to call when not running.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Marker sent on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Tokio-backed ticker that delivers [`Tick`]s over a channel.
///
/// The spawned task is aborted on `stop` and on drop.
pub struct IntervalTicker {
    period: Duration,
    sender: mpsc::UnboundedSender<Tick>,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    /// Creates a stopped ticker and the receiver its ticks arrive on.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let ticker = Self {
            period,
            sender,
            task: None,
        };
        (ticker, receiver)
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self) {
        self.stop();

        let sender = self.sender.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if sender.send(Tick).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(period_ms = period.as_millis() as u64, "countdown started");
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("countdown stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ticker driven by hand, for tests and headless use.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    running: bool,
    pub starts: usize,
    pub stops: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        if self.running {
            self.stops += 1;
        }
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
