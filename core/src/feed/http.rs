use nexttogo_types::formatting::format_race_title;

use super::{FeedError, FeedOutcome, NextRacesResponse, RaceFeed, RemoteRace};
use crate::context::AppConfig;

const NEXT_RACES_METHOD: &str = "nextraces";

/// `nextraces` endpoint under the configured API base.
pub fn next_races_url(api_base_url: &str) -> String {
    format!("{}/rest/v1/racing/", api_base_url.trim_end_matches('/'))
}

/// Decode a `nextraces` body. A JSON `null` body yields `Ok(None)`.
pub fn parse_next_races(body: &[u8]) -> Result<Option<Vec<RemoteRace>>, FeedError> {
    let response: Option<NextRacesResponse> = serde_json::from_slice(body)?;
    Ok(response.map(|r| r.data.into_races()))
}

/// Racing API client.
#[derive(Debug, Clone)]
pub struct HttpRaceFeed {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRaceFeed {
    pub fn new(config: &AppConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: next_races_url(&config.api_base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, count: usize) -> Result<Option<Vec<RemoteRace>>, FeedError> {
        let count = count.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("method", NEXT_RACES_METHOD), ("count", count.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_next_races(&body)
    }
}

impl RaceFeed for HttpRaceFeed {
    async fn fetch_next_races(&self, count: usize) -> FeedOutcome {
        tracing::debug!(endpoint = %self.endpoint, count, "Fetching next races");
        match self.request(count).await {
            Ok(races) => {
                if let Some(races) = &races {
                    for race in races {
                        tracing::trace!(
                            race_id = %race.race_id,
                            "Received {}",
                            format_race_title(race.race_number, &race.meeting_name)
                        );
                    }
                }
                FeedOutcome::Success(races)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Next races request failed");
                FeedOutcome::Error(e)
            }
        }
    }
}
