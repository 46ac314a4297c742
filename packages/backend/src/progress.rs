//! Percent-complete and remaining-time estimates for multi-fetch requests.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Progress of item `index` out of `total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Percentage of items done, rounded to two decimals.
    pub percent_complete: f64,
    /// Seconds left assuming every item takes as long as the ones so far.
    pub estimated_time_remaining: Option<f64>,
}

/// Estimate progress after finishing the zero-based item `index`.
pub fn estimate_progress(index: usize, total: usize, started: Instant) -> Progress {
    estimate(index, total, started.elapsed())
}

/// Linear extrapolation from the time spent so far.
///
/// `estimated_time_remaining` is `None` when nothing is done yet, when
/// `total` is zero, or when the extrapolation comes out at exactly zero.
pub fn estimate(index: usize, total: usize, elapsed: Duration) -> Progress {
    if total == 0 {
        return Progress {
            percent_complete: 0.0,
            estimated_time_remaining: None,
        };
    }

    let fraction = (index + 1) as f64 / total as f64;
    let elapsed = elapsed.as_secs_f64();
    let remaining = (fraction > 0.0)
        .then(|| elapsed / fraction - elapsed)
        .filter(|r| *r != 0.0);

    Progress {
        percent_complete: round2(fraction * 100.0),
        estimated_time_remaining: remaining.map(round2),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
