//! Core record types for counter observations, weather samples and forecasts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily intensity reading for a single counter.
///
/// The upstream store guarantees at most one observation per
/// (counter_id, date); [`crate::window::TrailingWindow`] enforces the same
/// invariant when rows are assembled in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterObservation {
    pub counter_id: String,
    pub date: NaiveDate,
    /// Number of bicycle passages counted over the day
    pub intensity: u32,
}

impl CounterObservation {
    pub fn new(counter_id: impl Into<String>, date: NaiveDate, intensity: u32) -> Self {
        Self {
            counter_id: counter_id.into(),
            date,
            intensity,
        }
    }
}

/// Counter coordinates rounded to 2 decimal places.
///
/// Stored as centi-degrees so the type is hashable and nearby counters
/// collapse onto the same key, letting a forecast run issue a single
/// weather query per physical neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundedCoordinates {
    lat_centi: i32,
    lon_centi: i32,
}

impl RoundedCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_centi: (latitude * 100.0).round() as i32,
            lon_centi: (longitude * 100.0).round() as i32,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.lat_centi as f64 / 100.0
    }

    pub fn longitude(&self) -> f64 {
        self.lon_centi as f64 / 100.0
    }
}

/// A tracked counter: a fixed physical sensor location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    pub id: String,
    pub coordinates: RoundedCoordinates,
}

impl Counter {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            coordinates: RoundedCoordinates::new(latitude, longitude),
        }
    }
}

/// Daily aggregated weather at one rounded coordinate.
///
/// Temperature and rain can go missing independently: an archive day may
/// report a rainfall sum while the temperature aggregate is still null, so
/// the sample keeps whatever the upstream actually observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub coordinates: RoundedCoordinates,
    pub date: NaiveDate,
    /// Daily mean temperature in degrees Celsius, when reported
    pub temperature: Option<f64>,
    /// Daily summed rainfall in millimetres
    pub rain: f64,
}

/// A forecast for one counter on one date. Persisted with upsert semantics
/// keyed by (counter_id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub counter_id: String,
    pub date: NaiveDate,
    pub forecast: f64,
}
