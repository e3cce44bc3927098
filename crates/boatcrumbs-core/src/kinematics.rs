//! Second pass: per-fix distance, elapsed time and speed against a
//! lookback baseline.
//!
//! The speed reported at index `i` is the average over the retained fixes
//! `[i - look_back, i]`, not an instantaneous rate. A wider window damps GPS
//! jitter at the cost of lagging real speed changes.
//!
//! Deltas are computed on `shifted_timestamp` directly. When the baseline
//! and the current fix carry different offsets the elapsed time mixes the
//! two offset bases.

use crate::config::LookBack;
use crate::error::{Result, TrackError};
use crate::geodesy::distance_miles;
use crate::timezone;
use crate::types::{AnnotatedFix, RawFix, RetainedFix};

pub const KNOTS_PER_MPH: f64 = 0.868976;
const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicAnnotator {
    look_back: LookBack,
}

impl KinematicAnnotator {
    pub fn new(look_back: LookBack) -> Self {
        Self { look_back }
    }

    pub fn pairwise() -> Self {
        Self::new(LookBack::PAIRWISE)
    }

    pub fn look_back(&self) -> LookBack {
        self.look_back
    }

    /// Annotates every fix. Fails on the first malformed `tz_offset`,
    /// out-of-range coordinate or unrepresentable timestamp; no partial
    /// output is returned.
    pub fn annotate(&self, retained: &[RetainedFix]) -> Result<Vec<AnnotatedFix>> {
        retained
            .iter()
            .enumerate()
            .map(|(index, current)| {
                let reference = &retained[self.look_back.reference_index(index)];
                annotate_fix(reference, current)
            })
            .collect()
    }
}

fn annotate_fix(reference: &RetainedFix, current: &RetainedFix) -> Result<AnnotatedFix> {
    let fix = &current.fix;
    check_coordinates(fix)?;
    let mut annotated = AnnotatedFix::unannotated(current);

    if reference.fix.shifted_timestamp != fix.shifted_timestamp {
        let delta_secs = fix
            .shifted_timestamp
            .checked_sub(reference.fix.shifted_timestamp)
            .ok_or(TrackError::TimestampOutOfRange(fix.shifted_timestamp))?
            as f64;
        let delta_miles = distance_miles(&reference.fix, fix);
        let mph = delta_miles / (delta_secs / SECONDS_PER_HOUR);

        annotated.delta_secs = delta_secs;
        annotated.delta_miles = delta_miles;
        annotated.mph = mph;
        annotated.knots = mph * KNOTS_PER_MPH;
    }

    annotated.utc_shifted_time = timezone::format_utc_shifted(fix.shifted_timestamp)?;
    annotated.local_time = timezone::format_local(fix.shifted_timestamp, &fix.tz_offset)?;
    Ok(annotated)
}

fn check_coordinates(fix: &RawFix) -> Result<()> {
    if (-90.0..=90.0).contains(&fix.latitude) && (-180.0..=180.0).contains(&fix.longitude) {
        return Ok(());
    }
    Err(TrackError::InvalidCoordinates {
        latitude: fix.latitude,
        longitude: fix.longitude,
        shifted_timestamp: fix.shifted_timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retained(latitude: f64, ts: i64) -> RetainedFix {
        RetainedFix::new(RawFix::new(latitude, -71.0, ts, "UTC-05:00"))
    }

    #[test]
    fn first_fix_has_zero_deltas() {
        let fixes = vec![retained(41.0, 0), retained(41.01, 60)];
        let annotated = KinematicAnnotator::default().annotate(&fixes).unwrap();

        let first = &annotated[0];
        assert_eq!(first.delta_secs, 0.0);
        assert_eq!(first.delta_miles, 0.0);
        assert_eq!(first.mph, 0.0);
        assert_eq!(first.knots, 0.0);
    }

    #[test]
    fn speed_uses_lookback_reference() {
        let fixes = vec![
            retained(41.00, 0),
            retained(41.01, 60),
            retained(41.02, 120),
            retained(41.03, 180),
        ];
        let annotated = KinematicAnnotator::new(LookBack::new(2).unwrap())
            .annotate(&fixes)
            .unwrap();

        // indices below the window compare against the first fix
        assert_eq!(annotated[1].delta_secs, 60.0);
        assert_eq!(annotated[2].delta_secs, 120.0);
        // index 3 compares against index 1
        assert_eq!(annotated[3].delta_secs, 120.0);
        let expected_miles = distance_miles(&fixes[1].fix, &fixes[3].fix);
        assert_eq!(annotated[3].delta_miles, expected_miles);
        assert_eq!(annotated[3].mph, expected_miles / (120.0 / 3600.0));
    }

    #[test]
    fn knots_are_exact_multiple_of_mph() {
        let fixes = vec![retained(41.00, 0), retained(41.013, 47), retained(41.05, 391)];
        let annotated = KinematicAnnotator::pairwise().annotate(&fixes).unwrap();
        for fix in annotated.iter().filter(|f| f.delta_secs > 0.0) {
            assert_eq!(fix.knots, fix.mph * 0.868976);
        }
    }

    #[test]
    fn zero_elapsed_window_yields_zero_speed() {
        let fixes = vec![retained(41.0, 100), retained(41.5, 100)];
        let annotated = KinematicAnnotator::pairwise().annotate(&fixes).unwrap();
        assert_eq!(annotated[1].delta_secs, 0.0);
        assert_eq!(annotated[1].delta_miles, 0.0);
        assert_eq!(annotated[1].mph, 0.0);
        assert_eq!(annotated[1].knots, 0.0);
    }

    #[test]
    fn dwell_fields_pass_through() {
        let mut first = retained(41.0, 0);
        first.duration_secs = 300.0;
        first.data_points = 6;
        let annotated = KinematicAnnotator::default().annotate(&[first]).unwrap();
        assert_eq!(annotated[0].duration_secs, 300.0);
        assert_eq!(annotated[0].data_points, 6);
    }

    #[test]
    fn display_strings_use_each_fixes_own_offset() {
        let fixes = vec![
            RetainedFix::new(RawFix::new(41.0, -71.0, 1_735_750_800, "UTC-05:00")),
            RetainedFix::new(RawFix::new(41.1, -71.0, 1_735_754_400, "UTC+05:30")),
        ];
        let annotated = KinematicAnnotator::default().annotate(&fixes).unwrap();
        assert_eq!(annotated[0].utc_shifted_time, "2025-01-01 17:00:00");
        assert_eq!(annotated[0].local_time, "2025-01-01 17:00:00-05:00");
        assert_eq!(annotated[1].utc_shifted_time, "2025-01-01 18:00:00");
        assert_eq!(annotated[1].local_time, "2025-01-01 18:00:00+05:30");
    }

    #[test]
    fn malformed_offset_fails_the_whole_batch() {
        let fixes = vec![
            retained(41.0, 0),
            RetainedFix::new(RawFix::new(41.1, -71.0, 60, "GMT+1")),
            retained(41.2, 120),
        ];
        let err = KinematicAnnotator::default().annotate(&fixes).unwrap_err();
        assert!(matches!(err, TrackError::Format(ref e) if e.value == "GMT+1"));
    }

    #[test]
    fn elapsed_time_overflow_is_reported_not_raised() {
        let reference = RetainedFix::new(RawFix::new(41.0, -71.0, i64::MIN, "UTC+00:00"));
        let current = RetainedFix::new(RawFix::new(41.1, -71.0, i64::MAX, "UTC+00:00"));
        let err = annotate_fix(&reference, &current).unwrap_err();
        assert!(matches!(err, TrackError::TimestampOutOfRange(i64::MAX)));

        let err = KinematicAnnotator::pairwise()
            .annotate(&[reference, current])
            .unwrap_err();
        assert!(matches!(err, TrackError::TimestampOutOfRange(_)));
    }

    #[test]
    fn invalid_coordinates_fail_the_batch() {
        let corrupt = [
            (f64::NAN, -71.0),
            (41.0, f64::INFINITY),
            (91.0, -71.0),
            (41.0, -181.0),
        ];
        for (latitude, longitude) in corrupt {
            let fixes = vec![
                retained(41.0, 0),
                RetainedFix::new(RawFix::new(latitude, longitude, 60, "UTC-05:00")),
            ];
            let err = KinematicAnnotator::default().annotate(&fixes).unwrap_err();
            assert!(matches!(err, TrackError::InvalidCoordinates { shifted_timestamp: 60, .. }));
            assert!(err.is_data_corruption());
        }
    }

    #[test]
    fn offset_change_inside_window_mixes_offset_bases() {
        // Same physical moment spacing (one hour of true UTC) but the second
        // fix crossed from UTC-05:00 into UTC-04:00, so its shifted stamp
        // moved by an extra hour. Elapsed time is taken at face value.
        let true_start = 1_735_768_800;
        let first = RawFix::new(41.0, -71.0, timezone::shift(true_start, -18000), "UTC-05:00");
        let second = RawFix::new(
            41.1,
            -71.0,
            timezone::shift(true_start + 3600, -14400),
            "UTC-04:00",
        );
        let annotated = KinematicAnnotator::pairwise()
            .annotate(&[first.into(), second.into()])
            .unwrap();

        assert_eq!(annotated[1].delta_secs, 7200.0);
    }
}
