//! Weather feature join
//!
//! Attaches same-day aggregated temperature and rainfall for a counter's
//! rounded coordinates. Temperature forward-fills from the last known daily
//! mean when the same-day sample is missing, and stays missing when the
//! coordinates have never been observed at all: a zero temperature would
//! silently shift a trained model's calibration, while zero rain is a valid
//! physical default.

use chrono::NaiveDate;
use counter_data::types::RoundedCoordinates;

use crate::error::Result;
use crate::store::WeatherStore;

/// Daily rainfall (mm) at or above which a day counts as rainy.
pub const RAIN_THRESHOLD: f64 = 0.1;

/// Weather-derived features for one coordinate and date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherFeatures {
    /// Daily mean temperature; `None` when no sample at these coordinates
    /// carries a reading.
    pub temperature: Option<f64>,
    /// Daily summed rainfall, 0.0 when absent.
    pub rain: f64,
    /// `rain >= RAIN_THRESHOLD`, inclusive at the boundary.
    pub is_rainy: bool,
}

impl WeatherFeatures {
    /// Join weather for one rounded coordinate and target date.
    pub fn join(
        store: &dyn WeatherStore,
        coordinates: RoundedCoordinates,
        date: NaiveDate,
    ) -> Result<Self> {
        let same_day = store.daily(coordinates, date)?;

        // Rain comes from the same-day sample even when its temperature is
        // null; only the temperature falls back to an earlier day.
        let temperature = match same_day.and_then(|sample| sample.temperature) {
            Some(temperature) => Some(temperature),
            None => store
                .latest_before(coordinates, date)?
                .and_then(|sample| sample.temperature),
        };
        let rain = same_day.map(|sample| sample.rain).unwrap_or(0.0);

        Ok(Self {
            temperature,
            rain,
            is_rainy: rain >= RAIN_THRESHOLD,
        })
    }
}
