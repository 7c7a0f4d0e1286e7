//! Next to Go races: feed gateway, race list state and per-race countdowns.

pub mod context;
pub mod countdown;
pub mod feed;
pub mod races;

// Re-exports for convenience
pub use context::AppConfig;
pub use countdown::{Clock, CountdownEngine, CountdownPhase, CountdownState, SystemClock};
pub use feed::{FeedError, FeedOutcome, HttpRaceFeed, RaceFeed};
pub use races::{Race, RaceListState, RaceService, RaceServiceHandle};
