//! Heading arithmetic in degrees.

/// Wrap any angle into [0, 360).
pub fn normalize_heading(deg: f64) -> f64 {
    let h = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
/// Positive is clockwise (right turn).
pub fn heading_delta(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Rotate `current` toward `target` by at most `max_step` degrees, taking the
/// shorter direction. Lands exactly on `target` when within one step.
pub fn turn_toward(current: f64, target: f64, max_step: f64, epsilon: f64) -> f64 {
    let delta = heading_delta(current, target);
    if delta.abs() <= max_step + epsilon {
        return normalize_heading(target);
    }
    normalize_heading(current + max_step.copysign(delta))
}
