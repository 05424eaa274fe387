//! Fixed-point angles in 1/64 degree
//!
//! Arc angles are stored as integers to keep the precision of the legacy storage format.
//! Arc angles are measured clockwise from grid east.

/// Fixed-point units per degree
pub const UNITS_PER_DEGREE: i32 = 64;

/// One full revolution in fixed-point units
pub const FULL_CIRCLE: i32 = 360 * UNITS_PER_DEGREE;

/// Convert degrees to fixed-point units, rounding to the nearest unit
pub fn from_degrees(degrees: f64) -> i32 {
    (degrees * UNITS_PER_DEGREE as f64).round() as i32
}

pub fn to_degrees(units: i32) -> f64 {
    units as f64 / UNITS_PER_DEGREE as f64
}

/// Reduce to `[0, FULL_CIRCLE)`
pub fn normalize(units: i32) -> i32 {
    units.rem_euclid(FULL_CIRCLE)
}

/// Check whether `angle` lies on the arc starting at `start` and spanning `sweep`
///
/// Positive sweeps cover `[start, start + sweep)` going clockwise, negative sweeps cover
/// `(start + sweep, start]` going anticlockwise. A sweep of zero covers nothing and a sweep
/// of a full circle (either sign) covers every angle.
pub fn on_arc(angle: i32, start: i32, sweep: i32) -> bool {
    if sweep.abs() >= FULL_CIRCLE {
        return true;
    }

    if sweep >= 0 {
        normalize(angle - start) < sweep
    } else {
        normalize(start - angle) < -sweep
    }
}
