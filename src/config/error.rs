use thiserror::Error;

use crate::sat_bands::BandError;
use crate::timestamp::TimestampError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("end_date cannot be earlier than start_date")]
    DateOrder,
    #[error("Invalid {field}: {source}")]
    Date {
        field: &'static str,
        source: TimestampError,
    },
    #[error("Invalid band: {0}")]
    Band(#[from] BandError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
