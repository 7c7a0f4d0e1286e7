use chrono::{DateTime, Utc};
use nexttogo_types::formatting::format_race_title;

use crate::feed::RemoteRace;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RaceMappingError {
    #[error("race {race_id} has an out-of-range start ({seconds}s since epoch)")]
    InvalidStart { race_id: String, seconds: i64 },
}

/// An upcoming race. Immutable once mapped from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Race {
    pub race_id: String,
    pub race_name: String,
    pub race_number: i32,
    pub meeting_id: String,
    pub meeting_name: String,
    pub category_id: String,
    pub advertised_start: DateTime<Utc>,
}

impl Race {
    /// Headline used in lists and logs, e.g. `R7 Beverly Hills`.
    pub fn title(&self) -> String {
        format_race_title(self.race_number, &self.meeting_name)
    }
}

impl TryFrom<RemoteRace> for Race {
    type Error = RaceMappingError;

    fn try_from(remote: RemoteRace) -> Result<Self, Self::Error> {
        let seconds = remote.advertised_start.seconds;
        let Some(advertised_start) = DateTime::from_timestamp(seconds, 0) else {
            return Err(RaceMappingError::InvalidStart {
                race_id: remote.race_id,
                seconds,
            });
        };

        Ok(Self {
            race_id: remote.race_id,
            race_name: remote.race_name,
            race_number: remote.race_number,
            meeting_id: remote.meeting_id,
            meeting_name: remote.meeting_name,
            category_id: remote.category_id,
            advertised_start,
        })
    }
}
