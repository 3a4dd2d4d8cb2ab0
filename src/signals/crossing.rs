//! Zero-line crossing detection

use crate::models::signal::CrossingState;

/// Position of the last, possibly still-forming period
pub const CURRENT: isize = -1;
/// Last fully closed period
pub const LAST_CLOSED: isize = -2;
/// Closed period before `LAST_CLOSED`
pub const PREVIOUS_CLOSED: isize = -3;

/// Value at a negative offset from the end (`-1` is the last element)
fn value_at(series: &[f64], idx: isize) -> Option<f64> {
    let back = idx.unsigned_abs();
    if back == 0 || back > series.len() {
        return None;
    }
    series.get(series.len() - back).copied()
}

/// Check whether `series` crossed zero between `idx_prior` and `idx_curr`.
///
/// Both indices count back from the end. Returns `(fired, new_state)`:
/// the crossing fires only when the computed side differs from
/// `prior_state`, so a recorded state suppresses repeats in the same
/// direction. With too little history the prior state is returned untouched.
pub fn check_cross(
    series: &[f64],
    prior_state: CrossingState,
    idx_curr: isize,
    idx_prior: isize,
) -> (bool, CrossingState) {
    let required = idx_curr.unsigned_abs().max(idx_prior.unsigned_abs());
    if series.len() < required {
        return (false, prior_state);
    }
    let (Some(curr), Some(prev)) = (value_at(series, idx_curr), value_at(series, idx_prior))
    else {
        return (false, prior_state);
    };

    let new_state = if curr > 0.0 {
        CrossingState::AboveZero
    } else {
        CrossingState::BelowZero
    };

    let crossed_up = prev <= 0.0 && curr > 0.0;
    let crossed_down = prev >= 0.0 && curr < 0.0;

    let fired = (crossed_up || crossed_down) && new_state != prior_state;
    (fired, new_state)
}
