use chrono::{DateTime, Utc};

/// Source of wall-clock time for countdowns.
///
/// Injected so tests can drive engines from a controlled timeline.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
