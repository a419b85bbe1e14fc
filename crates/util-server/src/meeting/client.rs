use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, instrument};

use super::error::MeetingError;
use super::mock::mock_meeting;
use super::types::MeetingData;

pub const DEFAULT_BASE_URL: &str = "https://api.read.ai/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the Read.AI API lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for MeetingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl MeetingConfig {
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Whether live requests can be made.
    pub fn is_available(&self) -> bool {
        self.api_key().is_some()
    }
}

/// Client for the Read.AI meetings API.
pub struct MeetingClient {
    http: reqwest::Client,
    config: MeetingConfig,
}

impl MeetingClient {
    pub fn new(config: MeetingConfig) -> Result<Self, MeetingError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &MeetingConfig {
        &self.config
    }

    /// Download the transcript and/or summary of a meeting.
    ///
    /// Without an API key no request is made and the error carries mock data.
    #[instrument(skip(self))]
    pub async fn fetch(
        &self,
        meeting_id: &str,
        include_transcript: bool,
        include_summary: bool,
    ) -> Result<MeetingData, MeetingError> {
        let Some(api_key) = self.config.api_key() else {
            debug!("no API key, returning mock data");
            return Err(MeetingError::NotConfigured {
                mock_data: Box::new(mock_meeting(meeting_id, include_transcript, include_summary)),
            });
        };

        let mut data = MeetingData {
            meeting_id: meeting_id.to_string(),
            transcript: None,
            summary: None,
        };
        if include_transcript {
            data.transcript = Some(self.get_resource(api_key, meeting_id, "transcript").await?);
        }
        if include_summary {
            data.summary = Some(self.get_resource(api_key, meeting_id, "summary").await?);
        }
        Ok(data)
    }

    async fn get_resource(
        &self,
        api_key: &str,
        meeting_id: &str,
        resource: &str,
    ) -> Result<Value, MeetingError> {
        let url = resource_url(&self.config.base_url, meeting_id, resource);
        debug!(%url, "requesting meeting resource");

        let response = self
            .http
            .get(&url)
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(MeetingError::Api {
                status: status.as_u16(),
                details,
            });
        }

        Ok(response.json().await?)
    }
}

fn resource_url(base_url: &str, meeting_id: &str, resource: &str) -> String {
    format!(
        "{}/meetings/{}/{}",
        base_url.trim_end_matches('/'),
        meeting_id,
        resource
    )
}
