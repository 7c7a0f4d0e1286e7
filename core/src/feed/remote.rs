//! Wire types for the racing API `nextraces` method.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextRacesResponse {
    pub status: i32,
    pub data: NextRacesData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NextRacesData {
    #[serde(default)]
    pub next_to_go_ids: Vec<String>,
    #[serde(default)]
    pub race_summaries: HashMap<String, RemoteRace>,
}

impl NextRacesData {
    /// Race summaries in `next_to_go_ids` order, followed by any summaries
    /// the id list does not mention.
    pub fn into_races(mut self) -> Vec<RemoteRace> {
        let mut races = Vec::with_capacity(self.race_summaries.len());
        for id in &self.next_to_go_ids {
            if let Some(race) = self.race_summaries.remove(id) {
                races.push(race);
            }
        }
        let mut rest: Vec<_> = self.race_summaries.into_values().collect();
        rest.sort_by(|a, b| a.race_id.cmp(&b.race_id));
        races.extend(rest);
        races
    }
}

/// One entry of `race_summaries` as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRace {
    pub race_id: String,
    pub race_name: String,
    pub race_number: i32,
    pub meeting_id: String,
    pub meeting_name: String,
    pub category_id: String,
    pub advertised_start: AdvertisedStart,
}

/// Start instant, nested as `{"seconds": <epoch seconds>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisedStart {
    pub seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": 200,
        "data": {
            "next_to_go_ids": ["b", "a"],
            "race_summaries": {
                "a": {
                    "race_id": "a",
                    "race_name": "Maiden Plate",
                    "race_number": 3,
                    "meeting_id": "m1",
                    "meeting_name": "Flemington",
                    "category_id": "4a2788f8-e825-4d36-9894-efd4baf1cfae",
                    "advertised_start": { "seconds": 1714564800 },
                    "venue_country": "AUS"
                },
                "b": {
                    "race_id": "b",
                    "race_name": "Sprint",
                    "race_number": 1,
                    "meeting_id": "m2",
                    "meeting_name": "Wentworth Park",
                    "category_id": "9daef0d7-bf3c-4f50-921d-8e818c60fe61",
                    "advertised_start": { "seconds": 1714564740 }
                }
            }
        },
        "message": "Next 2 races from each category"
    }"#;

    #[test]
    fn test_parse_next_races_response() {
        let response: NextRacesResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.data.race_summaries.len(), 2);

        let race = &response.data.race_summaries["a"];
        assert_eq!(race.meeting_name, "Flemington");
        assert_eq!(race.race_number, 3);
        assert_eq!(race.advertised_start.seconds, 1_714_564_800);
    }

    #[test]
    fn test_into_races_follows_next_to_go_order() {
        let response: NextRacesResponse = serde_json::from_str(SAMPLE).unwrap();
        let ids: Vec<_> = response
            .data
            .into_races()
            .into_iter()
            .map(|r| r.race_id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_into_races_keeps_unlisted_summaries() {
        let mut response: NextRacesResponse = serde_json::from_str(SAMPLE).unwrap();
        response.data.next_to_go_ids = vec!["a".to_string(), "missing".to_string()];
        let ids: Vec<_> = response
            .data
            .into_races()
            .into_iter()
            .map(|r| r.race_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_data_fields_default_to_empty() {
        let response: NextRacesResponse =
            serde_json::from_str(r#"{"status": 200, "data": {}}"#).unwrap();
        assert!(response.data.into_races().is_empty());
    }
}
