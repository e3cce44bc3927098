use serde::Serialize;

use crate::geodesy::geodesic_miles;
use crate::types::AnnotatedFix;

/// A run of consecutive fixes with no large time or distance jump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Index of the first fix, inclusive.
    pub start: usize,
    /// Index of the last fix, inclusive.
    pub end: usize,
    pub distance_miles: f64,
    pub elapsed_secs: f64,
    pub max_knots: f64,
}

impl Segment {
    fn open(index: usize, fix: &AnnotatedFix) -> Self {
        Self {
            start: index,
            end: index,
            distance_miles: 0.0,
            elapsed_secs: 0.0,
            max_knots: fix.knots,
        }
    }

    pub fn fix_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Splits the track wherever the gap to the previous fix exceeds
/// `max_gap_secs` or `max_gap_miles`.
pub fn split_segments(
    fixes: &[AnnotatedFix],
    max_gap_secs: f64,
    max_gap_miles: f64,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let Some(first) = fixes.first() else {
        return segments;
    };

    let mut current = Segment::open(0, first);
    let mut segment_start_ts = first.shifted_timestamp;

    for (index, pair) in fixes.windows(2).enumerate() {
        let (prev, fix) = (&pair[0], &pair[1]);
        let index = index + 1;

        let time_gap = fix.shifted_timestamp as f64 - prev.shifted_timestamp as f64;
        let dist_gap = geodesic_miles(
            (prev.latitude, prev.longitude),
            (fix.latitude, fix.longitude),
        );

        if time_gap > max_gap_secs || dist_gap > max_gap_miles {
            segments.push(current);
            current = Segment::open(index, fix);
            segment_start_ts = fix.shifted_timestamp;
            continue;
        }

        current.end = index;
        current.distance_miles += dist_gap;
        current.elapsed_secs = fix.shifted_timestamp as f64 - segment_start_ts as f64;
        current.max_knots = current.max_knots.max(fix.knots);
    }

    segments.push(current);
    segments
}
