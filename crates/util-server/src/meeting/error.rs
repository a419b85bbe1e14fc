use thiserror::Error;

use super::types::MeetingData;

#[derive(Debug, Error)]
pub enum MeetingError {
    /// No API key; carries mock data so callers can still develop against it.
    #[error("Read.AI API key not configured")]
    NotConfigured { mock_data: Box<MeetingData> },

    #[error("Read.AI API error: {status}")]
    Api { status: u16, details: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl MeetingError {
    /// How to fix the configuration, when that is the problem.
    pub fn config_help(&self) -> Option<&'static str> {
        match self {
            MeetingError::NotConfigured { .. } => Some("Set READ_AI_API_KEY environment variable"),
            _ => None,
        }
    }
}
