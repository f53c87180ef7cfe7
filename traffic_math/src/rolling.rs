//! Rolling window calculations for count series
//!
//! A rolling window over a sparse daily series may hold fewer values than
//! its nominal span. The functions here make the minimum-observation
//! requirement explicit instead of silently averaging whatever is present.

use crate::{MathError, Result};

/// Arithmetic mean of a non-empty slice
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty window".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of a window that must contain at least `min_obs` values
///
/// Returns `InsufficientData` when the window is too sparse, so callers can
/// fall back to an alternative window rather than report a partial mean.
pub fn thresholded_mean(values: &[f64], min_obs: usize) -> Result<f64> {
    if min_obs == 0 {
        return Err(MathError::InvalidInput(
            "Minimum observation count must be greater than zero".to_string(),
        ));
    }

    if values.len() < min_obs {
        return Err(MathError::InsufficientData(format!(
            "Window holds {} observations, need at least {}",
            values.len(),
            min_obs
        )));
    }

    mean(values)
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
