//! Race feed gateway
//!
//! The only source of races. [`RaceFeed`] is the seam the race service talks
//! to; [`HttpRaceFeed`] is the production implementation over the racing
//! REST API.

mod http;
mod remote;

use std::future::Future;

pub use http::{HttpRaceFeed, next_races_url, parse_next_races};
pub use remote::{AdvertisedStart, NextRacesData, NextRacesResponse, RemoteRace};

/// Result of one step of a feed request.
#[derive(Debug)]
pub enum FeedOutcome {
    /// A request is in flight.
    Loading,
    /// The call succeeded. `None` when the API returned no payload at all.
    Success(Option<Vec<RemoteRace>>),
    Error(FeedError),
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait RaceFeed: Send + Sync + 'static {
    /// Fetch up to `count` upcoming races. Never `Loading`; that state is
    /// reported by the caller before the request starts.
    fn fetch_next_races(&self, count: usize) -> impl Future<Output = FeedOutcome> + Send;
}
