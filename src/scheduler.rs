//! Cancellable repeating tick

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Repeating timer that posts a message every period until stopped
///
/// Every start bumps a generation number carried by the messages, so a
/// tick already queued by a cancelled run can be told apart and dropped.
pub struct TickScheduler<E> {
    period: Duration,
    tx: UnboundedSender<E>,
    make_event: fn(u64) -> E,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl<E: Send + 'static> TickScheduler<E> {
    /// Creates a stopped scheduler
    ///
    /// # Arguments
    /// * `period` - Time between ticks
    /// * `tx` - Channel ticks are posted to
    /// * `make_event` - Wraps a generation number into a message
    pub fn new(period: Duration, tx: UnboundedSender<E>, make_event: fn(u64) -> E) -> Self {
        Self {
            period,
            tx,
            make_event,
            generation: 0,
            handle: None,
        }
    }

    /// Starts ticking, cancelling any previous run first
    pub fn start(&mut self) {
        self.stop();
        self.generation += 1;

        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();
        let make_event = self.make_event;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(make_event(generation)).is_err() {
                    break;
                }
            }
        }));

        tracing::debug!(
            generation = generation,
            period_ms = period.as_millis() as u64,
            "Tick scheduler started"
        );
    }

    /// Stops ticking; a no-op when already stopped
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "Tick scheduler stopped");
        }
    }

    /// Restarts so the next tick is a full period away
    pub fn reset(&mut self) {
        self.start();
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether a tick of `generation` belongs to the current run
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_active() && generation == self.generation
    }
}

impl<E> Drop for TickScheduler<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
