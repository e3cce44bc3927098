use serde::{Deserialize, Serialize};

/// One GPS sample as delivered by the fix source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(alias = "gmt_timestamp")]
    pub shifted_timestamp: i64,
    pub tz_offset: String,
}

impl RawFix {
    pub fn new(
        latitude: f64,
        longitude: f64,
        shifted_timestamp: i64,
        tz_offset: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            shifted_timestamp,
            tz_offset: tz_offset.into(),
        }
    }
}

/// A fix kept by the movement filter, carrying the dwell that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedFix {
    pub fix: RawFix,
    pub duration_secs: f64,
    pub data_points: u32,
}

impl RetainedFix {
    pub fn new(fix: RawFix) -> Self {
        Self {
            fix,
            duration_secs: 0.0,
            data_points: 1,
        }
    }
}

impl From<RawFix> for RetainedFix {
    fn from(fix: RawFix) -> Self {
        RetainedFix::new(fix)
    }
}

/// Output record: the raw fields plus every derived kinematic field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedFix {
    pub latitude: f64,
    pub longitude: f64,
    pub shifted_timestamp: i64,
    pub tz_offset: String,
    pub utc_shifted_time: String,
    pub local_time: String,
    pub delta_miles: f64,
    pub delta_secs: f64,
    pub mph: f64,
    pub knots: f64,
    pub duration_secs: f64,
    pub data_points: u32,
}

impl AnnotatedFix {
    /// Copies the retained fix with every kinematic field zeroed and the
    /// display strings empty.
    pub fn unannotated(retained: &RetainedFix) -> Self {
        let fix = &retained.fix;
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            shifted_timestamp: fix.shifted_timestamp,
            tz_offset: fix.tz_offset.clone(),
            utc_shifted_time: String::new(),
            local_time: String::new(),
            delta_miles: 0.0,
            delta_secs: 0.0,
            mph: 0.0,
            knots: 0.0,
            duration_secs: retained.duration_secs,
            data_points: retained.data_points,
        }
    }
}
