//! Lagged and rolling feature reconstruction
//!
//! Live daily forecasting cannot assume a fully populated window: counters
//! go offline and ingestion lags. Each feature therefore carries a fallback
//! search over older proxies instead of refusing to produce a value.
//!
//! The two lag searches deliberately run in opposite directions: lag_7d
//! walks further back on a miss (7 → 14 → 21 → 28) while lag_28d walks
//! toward the target (28 → 21 → 14 → 7), so each horizon falls back to the
//! closest proxy available for it.

use chrono::{Duration, NaiveDate};
use counter_data::window::TrailingWindow;
use traffic_math::rolling;

const LAG_7_OFFSETS: [i64; 4] = [7, 14, 21, 28];
const LAG_28_OFFSETS: [i64; 4] = [28, 21, 14, 7];
/// Shifts applied to the 7-day rolling window on a sparse miss.
const ROLLING_7_SHIFTS: [i64; 4] = [0, 7, 14, 21];
const ROLLING_7_MIN_OBS: usize = 4;
const ROLLING_28_MIN_OBS: usize = 14;

/// Reconstructed lag and rolling features for one counter and target date.
/// `None` means the fallback search was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LagFeatures {
    pub lag_7d: Option<f64>,
    pub lag_28d: Option<f64>,
    pub rolling_7d: Option<f64>,
    pub rolling_28d: Option<f64>,
}

impl LagFeatures {
    /// Reconstruct all four features from a per-counter trailing window.
    pub fn reconstruct(window: &TrailingWindow, target: NaiveDate) -> Self {
        Self {
            lag_7d: lag_7d(window, target),
            lag_28d: lag_28d(window, target),
            rolling_7d: rolling_7d(window, target),
            rolling_28d: rolling_28d(window, target),
        }
    }

    /// True when not a single feature could be reconstructed.
    pub fn is_all_missing(&self) -> bool {
        self.lag_7d.is_none()
            && self.lag_28d.is_none()
            && self.rolling_7d.is_none()
            && self.rolling_28d.is_none()
    }
}

fn lag_search(window: &TrailingWindow, target: NaiveDate, offsets: &[i64]) -> Option<f64> {
    offsets
        .iter()
        .find_map(|&offset| window.intensity_on(target - Duration::days(offset)))
}

/// Intensity observed 7 days before the target, falling back to 14, 21,
/// then 28 days before.
pub fn lag_7d(window: &TrailingWindow, target: NaiveDate) -> Option<f64> {
    lag_search(window, target, &LAG_7_OFFSETS)
}

/// Intensity observed 28 days before the target, falling back to 21, 14,
/// then 7 days before.
pub fn lag_28d(window: &TrailingWindow, target: NaiveDate) -> Option<f64> {
    lag_search(window, target, &LAG_28_OFFSETS)
}

/// Mean intensity over `[target-7, target-1]`, rounded to 2 decimals.
///
/// A candidate window qualifies only with at least 4 observations;
/// otherwise the whole window shifts back 7 days, up to 3 times.
pub fn rolling_7d(window: &TrailingWindow, target: NaiveDate) -> Option<f64> {
    for shift in ROLLING_7_SHIFTS {
        let end = target - Duration::days(1 + shift);
        let start = end - Duration::days(6);
        let values = window.intensities_between(start, end);
        if let Ok(mean) = rolling::thresholded_mean(&values, ROLLING_7_MIN_OBS) {
            return Some(rolling::round2(mean));
        }
    }

    None
}

/// Mean intensity over `[target-28, target-1]`, rounded to 2 decimals.
///
/// Requires at least 14 observations in the span; no shifted retry.
pub fn rolling_28d(window: &TrailingWindow, target: NaiveDate) -> Option<f64> {
    let end = target - Duration::days(1);
    let start = end - Duration::days(27);
    let values = window.intensities_between(start, end);

    rolling::thresholded_mean(&values, ROLLING_28_MIN_OBS)
        .ok()
        .map(rolling::round2)
}
