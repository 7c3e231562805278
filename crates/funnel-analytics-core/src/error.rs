use chrono::NaiveDate;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum FunnelAnalyticsError {
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Record rejected with {} validation error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FunnelAnalyticsError {
    fn from(e: serde_json::Error) -> Self {
        FunnelAnalyticsError::SerializationError(e.to_string())
    }
}
