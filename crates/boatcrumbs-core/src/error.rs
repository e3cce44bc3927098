// crates/boatcrumbs-core/src/error.rs

use thiserror::Error;

use crate::range::DateRangeError;
use crate::timezone::OffsetFormatError;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    Format(#[from] OffsetFormatError),

    #[error("shifted timestamp {0} is outside the representable range")]
    TimestampOutOfRange(i64),

    #[error("fix at shifted timestamp {shifted_timestamp} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        latitude: f64,
        longitude: f64,
        shifted_timestamp: i64,
    },

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    #[error("failed to read configuration: {0}")]
    ConfigSyntax(#[from] toml::de::Error),

    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackError {
    /// True for failures caused by corrupted fix data rather than caller input.
    pub fn is_data_corruption(&self) -> bool {
        matches!(
            self,
            TrackError::Format(_)
                | TrackError::TimestampOutOfRange(_)
                | TrackError::InvalidCoordinates { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
