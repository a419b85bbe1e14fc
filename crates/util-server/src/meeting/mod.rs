//! Read.AI meeting data: HTTP client, payload types and development mock data.

mod client;
mod error;
pub mod mock;
mod types;

pub use client::{MeetingClient, MeetingConfig, DEFAULT_BASE_URL};
pub use error::MeetingError;
pub use types::{MeetingData, Summary, Transcript};
