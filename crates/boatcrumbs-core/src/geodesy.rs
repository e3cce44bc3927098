use geo::{Distance, Geodesic, Point};

use crate::types::RawFix;

pub const METERS_PER_MILE: f64 = 1609.344;

/// WGS-84 geodesic distance between two fixes, in statute miles.
///
/// Identical coordinates always yield exactly `0.0`; the movement filter
/// relies on that equality.
pub fn distance_miles(from: &RawFix, to: &RawFix) -> f64 {
    geodesic_miles((from.latitude, from.longitude), (to.latitude, to.longitude))
}

/// Same as [`distance_miles`] for bare `(latitude, longitude)` pairs.
/// Non-finite coordinates yield NaN.
pub fn geodesic_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    if from == to {
        return 0.0;
    }
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return f64::NAN;
    }
    let origin = Point::new(from.1, from.0);
    let destination = Point::new(to.1, to.0);
    Geodesic::distance(origin, destination) / METERS_PER_MILE
}
