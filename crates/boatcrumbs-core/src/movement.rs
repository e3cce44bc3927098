use tracing::debug;

use crate::geodesy::distance_miles;
use crate::types::{RawFix, RetainedFix};

/// Single forward pass that keeps a fix only when the vessel has moved
/// since the last kept fix. Stationary samples are folded into the last
/// kept fix as dwell time.
///
/// Expects fixes in ascending `shifted_timestamp` order; does not check it.
#[derive(Debug, Default)]
pub struct MovementFilter {
    retained: Vec<RetainedFix>,
    coalesced: usize,
}

impl MovementFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            retained: Vec::with_capacity(capacity),
            coalesced: 0,
        }
    }

    pub fn push(&mut self, fix: RawFix) {
        let Some(last) = self.retained.last_mut() else {
            self.retained.push(RetainedFix::new(fix));
            return;
        };

        // NaN distances from corrupt coordinates are kept so the annotator
        // rejects them instead of hiding them as dwell.
        let distance = distance_miles(&last.fix, &fix);
        if distance > 0.0 || distance.is_nan() {
            self.retained.push(RetainedFix::new(fix));
            return;
        }

        // Span to the latest stationary sample, not a running sum.
        last.duration_secs = span_secs(last.fix.shifted_timestamp, fix.shifted_timestamp);
        last.data_points += 1;
        self.coalesced += 1;
    }

    pub fn finish(self) -> Vec<RetainedFix> {
        debug!(
            retained = self.retained.len(),
            coalesced = self.coalesced,
            "movement filter finished"
        );
        self.retained
    }
}

fn span_secs(from: i64, to: i64) -> f64 {
    to as f64 - from as f64
}

/// Runs the movement filter over the whole stream.
pub fn filter_movement<I>(fixes: I) -> Vec<RetainedFix>
where
    I: IntoIterator<Item = RawFix>,
{
    let iter = fixes.into_iter();
    let mut filter = MovementFilter::with_capacity(iter.size_hint().0);
    for fix in iter {
        filter.push(fix);
    }
    filter.finish()
}
