//! Race list
//!
//! - **Race**: one upcoming race, mapped from a feed record
//! - **RaceListState**: the race set plus filter selection and load flags,
//!   with the derived sorted/limited/filtered view
//! - **RaceService**: the serial owner that applies intents, runs feed
//!   requests and publishes state snapshots

mod list_state;
mod race;
mod service;


pub use list_state::{ExpiryOutcome, LoadFailure, RaceListState};
pub use race::{Race, RaceMappingError};
pub use service::{RaceService, RaceServiceHandle, ServiceError};
