//! Self-rescheduling countdown for a single race.
//!
//! An armed engine owns one tokio task that sleeps until the next boundary
//! chosen by [`next_wake_delay`], re-evaluates against the clock, publishes the
//! new [`CountdownState`] and schedules itself again. There is no fixed
//! interval: every delay is recomputed from absolute time, so clock jumps are
//! corrected on the next wake-up.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use nexttogo_types::formatting::format_time_remaining;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::clock::Clock;
use super::schedule::{
    ACTIVATION_THRESHOLD_SECS, CountdownPhase, compute_remaining, next_wake_delay,
};

/// Invoked once when the countdown reaches [`CountdownPhase::Expired`].
pub type ExpiryCallback = Box<dyn FnOnce() + Send + 'static>;

/// Snapshot published on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub target_time: DateTime<Utc>,
    /// Signed; negative once the advertised start has passed.
    pub remaining_seconds: i64,
    pub phase: CountdownPhase,
}

impl CountdownState {
    pub fn evaluate(now: DateTime<Utc>, target_time: DateTime<Utc>) -> Self {
        let remaining_seconds = compute_remaining(now, target_time);
        Self {
            target_time,
            remaining_seconds,
            phase: CountdownPhase::from_remaining(remaining_seconds),
        }
    }

    /// Display label, e.g. `3 m` or `-12 s`.
    pub fn label(&self) -> String {
        format_time_remaining(self.remaining_seconds)
    }

    /// Inside the countdown window (renderers highlight these).
    pub fn is_urgent(&self) -> bool {
        self.remaining_seconds <= ACTIVATION_THRESHOLD_SECS
    }
}

/// State shared between the engine handle and its wake-up task.
pub(super) struct Ticker {
    target: DateTime<Utc>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<CountdownState>,
    on_expired: Mutex<Option<ExpiryCallback>>,
    /// Bumped on every disarm. Evaluation and publish happen under this lock,
    /// so a wake-up from an older arm that is already running cannot publish
    /// once `revoke` has returned.
    generation: Mutex<u64>,
}

impl Ticker {
    pub(super) fn generation(&self) -> u64 {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn revoke(&self) {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    /// Re-evaluate against the clock and publish. Returns the delay before the
    /// next evaluation, or `None` once expired or when `generation` is stale.
    pub(super) fn tick(&self, generation: u64) -> Option<Duration> {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            return None;
        }
        let now = self.clock.now();
        let state = CountdownState::evaluate(now, self.target);
        self.state.send_replace(state);
        drop(current);

        let delay = next_wake_delay(now, self.target);
        tracing::debug!(
            target_time = %self.target,
            remaining = state.remaining_seconds,
            phase = ?state.phase,
            next_wake_ms = delay.map(|d| d.as_millis() as u64),
            "Countdown evaluated"
        );

        if delay.is_none() {
            self.fire_expiry();
        }
        delay
    }

    fn fire_expiry(&self) {
        let callback = self
            .on_expired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(callback) = callback {
            tracing::info!(target_time = %self.target, "Countdown expired");
            callback();
        }
    }

    fn has_fired(&self) -> bool {
        self.on_expired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Countdown to one race's advertised start.
///
/// Engines start disarmed. The owning view calls [`arm`](Self::arm) when it
/// becomes visible/resumed and [`disarm`](Self::disarm) when it is paused;
/// dropping the engine disarms it, so a torn-down view never receives a late
/// expiry. Requires a tokio runtime to arm.
pub struct CountdownEngine {
    ticker: Arc<Ticker>,
    task: Option<JoinHandle<()>>,
}

impl CountdownEngine {
    pub fn new(
        target: DateTime<Utc>,
        clock: Arc<dyn Clock>,
        on_expired: impl FnOnce() + Send + 'static,
    ) -> Self {
        let initial = CountdownState::evaluate(clock.now(), target);
        let (state, _) = watch::channel(initial);
        Self {
            ticker: Arc::new(Ticker {
                target,
                clock,
                state,
                on_expired: Mutex::new(Some(Box::new(on_expired))),
                generation: Mutex::new(0),
            }),
            task: None,
        }
    }

    /// Start (or resume) ticking.
    ///
    /// Recomputes the remaining time from the clock immediately; nothing from
    /// before a pause is reused. No-op when already armed or expired.
    pub fn arm(&mut self) {
        if self.is_armed() || self.ticker.has_fired() {
            return;
        }

        let generation = self.ticker.generation();
        let Some(first_delay) = self.ticker.tick(generation) else {
            self.task = None;
            return;
        };

        let ticker = Arc::clone(&self.ticker);
        self.task = Some(tokio::spawn(async move {
            let mut delay = first_delay;
            loop {
                tokio::time::sleep(delay).await;
                match ticker.tick(generation) {
                    Some(next) => delay = next,
                    None => break,
                }
            }
        }));
    }

    /// Cancel the pending wake-up. The last published state is kept.
    ///
    /// A wake-up already running on another worker is revoked too: it can no
    /// longer publish after this returns, so a following `arm` always wins.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            self.ticker.revoke();
            task.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn target_time(&self) -> DateTime<Utc> {
        self.ticker.target
    }

    pub fn state(&self) -> CountdownState {
        *self.ticker.state.borrow()
    }

    /// Receive every published state; the receiver starts at the current one.
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.ticker.state.subscribe()
    }

    #[cfg(test)]
    pub(super) fn ticker(&self) -> &Arc<Ticker> {
        &self.ticker
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl std::fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("state", &self.state())
            .field("armed", &self.is_armed())
            .finish()
    }
}
