//! Fixed UTC-offset handling for device timestamps.
//!
//! Fixes arrive with a *shifted* timestamp: the true UTC epoch plus the
//! local UTC offset, so that formatting the integer as if it were UTC shows
//! the local wall clock. `shift`/`unshift` convert between the two domains.

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

use crate::error::{Result, TrackError};

const SECONDS_PER_HOUR: i32 = 3600;
const SECONDS_PER_MINUTE: i32 = 60;
const SECONDS_PER_DAY: i32 = 86_400;

pub const UTC_SHIFTED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timezone offset format: '{value}' (expected UTC±HH:MM)")]
pub struct OffsetFormatError {
    pub value: String,
}

impl OffsetFormatError {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

/// Parses `UTC+HH:MM` / `UTC-HH:MM` into signed seconds east of UTC.
pub fn parse_offset(value: &str) -> std::result::Result<i32, OffsetFormatError> {
    let rest = value
        .strip_prefix("UTC")
        .ok_or_else(|| OffsetFormatError::new(value))?;

    let bytes = rest.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return Err(OffsetFormatError::new(value));
    }

    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(OffsetFormatError::new(value)),
    };

    let hours = two_digits(&bytes[1..3]).ok_or_else(|| OffsetFormatError::new(value))?;
    let minutes = two_digits(&bytes[4..6]).ok_or_else(|| OffsetFormatError::new(value))?;
    // Minutes may carry into the hour ("UTC+05:60" is six hours); only the
    // total has to stay under a day.
    let total = hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE;
    if total >= SECONDS_PER_DAY {
        return Err(OffsetFormatError::new(value));
    }

    Ok(sign * total)
}

fn two_digits(pair: &[u8]) -> Option<i32> {
    match pair {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => {
            Some(i32::from(tens - b'0') * 10 + i32::from(ones - b'0'))
        }
        _ => None,
    }
}

/// Parses the offset string into a chrono timezone.
pub fn fixed_offset(value: &str) -> std::result::Result<FixedOffset, OffsetFormatError> {
    let seconds = parse_offset(value)?;
    FixedOffset::east_opt(seconds).ok_or_else(|| OffsetFormatError::new(value))
}

pub fn shift(true_utc_epoch: i64, offset_secs: i32) -> i64 {
    true_utc_epoch + i64::from(offset_secs)
}

pub fn unshift(shifted: i64, offset_secs: i32) -> i64 {
    shifted - i64::from(offset_secs)
}

/// Formats the shifted timestamp as though it were a UTC instant. By
/// construction the result reads as the local wall clock.
pub fn format_utc_shifted(shifted: i64) -> Result<String> {
    let dt = DateTime::<Utc>::from_timestamp(shifted, 0)
        .ok_or(TrackError::TimestampOutOfRange(shifted))?;
    Ok(dt.format(UTC_SHIFTED_FORMAT).to_string())
}

/// Recovers the true UTC instant and renders it in the fix's own offset.
pub fn format_local(shifted: i64, tz_offset: &str) -> Result<String> {
    let offset = fixed_offset(tz_offset)?;
    let dt = shifted
        .checked_sub(i64::from(offset.local_minus_utc()))
        .and_then(|true_utc| DateTime::<Utc>::from_timestamp(true_utc, 0))
        .ok_or(TrackError::TimestampOutOfRange(shifted))?;
    Ok(dt
        .with_timezone(&offset)
        .format(LOCAL_TIME_FORMAT)
        .to_string())
}
