use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CALENDAR_DAY_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("invalid date '{0}' (expected YYYYMMDD)")]
    InvalidDate(String),
    #[error("from_date must be less than or equal to to_date ({from_ts} > {to_ts})")]
    Inverted { from_ts: i64, to_ts: i64 },
}

/// Inclusive bounds on `shifted_timestamp` for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from_ts: i64,
    pub to_ts: i64,
}

impl DateRange {
    pub fn new(from_ts: i64, to_ts: i64) -> Result<Self, DateRangeError> {
        if from_ts > to_ts {
            return Err(DateRangeError::Inverted { from_ts, to_ts });
        }
        Ok(Self { from_ts, to_ts })
    }

    /// Start day at 00:01 UTC through end day at 23:59 UTC.
    pub fn from_calendar_days(from_date: &str, to_date: &str) -> Result<Self, DateRangeError> {
        let from_day = parse_calendar_day(from_date)?;
        let to_day = parse_calendar_day(to_date)?;

        let from_ts = from_day
            .and_time(NaiveTime::from_hms_opt(0, 1, 0).unwrap_or(NaiveTime::MIN))
            .and_utc()
            .timestamp();
        let to_ts = to_day
            .and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN))
            .and_utc()
            .timestamp();

        Self::new(from_ts, to_ts)
    }

    pub fn contains(&self, ts: i64) -> bool {
        (self.from_ts..=self.to_ts).contains(&ts)
    }
}

fn parse_calendar_day(value: &str) -> Result<NaiveDate, DateRangeError> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateRangeError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, CALENDAR_DAY_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(value.to_string()))
}
