//! Error types for time-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid datetime format: {0}")]
    InvalidFormat(String),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, TimeError>;
