use serde::Serialize;

use crate::config::PipelineConfig;
use crate::segments::{split_segments, Segment};
use crate::stops::{idle_stops, IdleStop};
use crate::types::AnnotatedFix;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub fix_count: usize,
    pub total_distance_miles: f64,
    pub max_knots: f64,
    pub segments: Vec<Segment>,
    pub stops: Vec<IdleStop>,
}

impl TrackSummary {
    pub fn build(fixes: &[AnnotatedFix], config: &PipelineConfig) -> Self {
        let segments = split_segments(
            fixes,
            config.segment_max_gap_secs,
            config.segment_max_gap_miles,
        );
        let stops = idle_stops(fixes, config.idle_min_secs);

        Self {
            fix_count: fixes.len(),
            total_distance_miles: segments.iter().map(|s| s.distance_miles).sum(),
            max_knots: segments.iter().map(|s| s.max_knots).fold(0.0, f64::max),
            segments,
            stops,
        }
    }
}
