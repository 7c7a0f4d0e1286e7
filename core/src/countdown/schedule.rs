//! Pure countdown arithmetic: remaining seconds, phase and next wake-up.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Countdown becomes Active once this many seconds or fewer remain.
pub const ACTIVATION_THRESHOLD_SECS: i64 = 60;
/// Countdown expires this many seconds after the advertised start.
pub const EXPIRY_THRESHOLD_SECS: i64 = -60;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CountdownPhase {
    /// Far from the start; re-evaluated on minute boundaries.
    #[default]
    Dormant,
    /// Inside the countdown window; re-evaluated on every second boundary.
    Active,
    /// Terminal. Expiry has been signalled.
    Expired,
}

impl CountdownPhase {
    pub fn from_remaining(remaining_secs: i64) -> Self {
        if remaining_secs <= EXPIRY_THRESHOLD_SECS {
            Self::Expired
        } else if remaining_secs <= ACTIVATION_THRESHOLD_SECS {
            Self::Active
        } else {
            Self::Dormant
        }
    }
}

/// Whole seconds until `target`, rounded toward later.
///
/// Any sub-second remainder counts as a full second so the label never reads
/// zero while time is still left.
pub fn compute_remaining(now: DateTime<Utc>, target: DateTime<Utc>) -> i64 {
    let millis = (target - now).num_milliseconds();
    millis.div_euclid(MILLIS_PER_SECOND) + i64::from(millis.rem_euclid(MILLIS_PER_SECOND) != 0)
}

/// Delay before the countdown for `target` must be evaluated again, or `None`
/// once it has expired.
///
/// The phase is derived from the same `now` the delay is computed from, so a
/// threshold crossed during a sleep is acted on at the very next wake-up.
pub fn next_wake_delay(now: DateTime<Utc>, target: DateTime<Utc>) -> Option<Duration> {
    let remaining = compute_remaining(now, target);
    match CountdownPhase::from_remaining(remaining) {
        CountdownPhase::Dormant => {
            let to_minute = millis_until_boundary(now, MILLIS_PER_MINUTE);
            // Never sleep past the moment the countdown window opens.
            let to_activation =
                (target - now).num_milliseconds() - ACTIVATION_THRESHOLD_SECS * MILLIS_PER_SECOND;
            Some(millis(to_minute.min(to_activation.max(1))))
        }
        CountdownPhase::Active => Some(millis(millis_until_boundary(now, MILLIS_PER_SECOND))),
        CountdownPhase::Expired => None,
    }
}

/// Milliseconds until the wall clock next reaches a multiple of `period`,
/// in `1..=period`.
fn millis_until_boundary(now: DateTime<Utc>, period: i64) -> i64 {
    period - now.timestamp_millis().rem_euclid(period)
}

fn millis(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}
