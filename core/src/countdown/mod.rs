//! Countdown engine
//!
//! Tracks time-to-start for a single race and decides how soon it needs to
//! look at the clock again:
//!
//! ```text
//!   remaining > 60s          -60s < remaining <= 60s       remaining <= -60s
//! ┌──────────────┐  minute   ┌──────────────┐  second    ┌──────────────┐
//! │   Dormant    │ ────────▶ │    Active    │ ─────────▶ │   Expired    │
//! │ wake: minute │ boundary  │ wake: second │ boundary   │ fire once,   │
//! └──────────────┘           └──────────────┘            │ stop         │
//!                                                        └──────────────┘
//! ```

mod clock;
mod engine;
mod schedule;


pub use clock::{Clock, SystemClock};
pub use engine::{CountdownEngine, CountdownState, ExpiryCallback};
pub use schedule::{
    ACTIVATION_THRESHOLD_SECS, CountdownPhase, EXPIRY_THRESHOLD_SECS, compute_remaining,
    next_wake_delay,
};
