//! Feature vector assembly
//!
//! Combines calendar, lag/rolling and weather features into the fixed-order
//! vector the predictor was trained on. Column order is a hard external
//! contract: a mismatched order silently produces wrong predictions without
//! any error, so the order lives in one place ([`FEATURE_COLUMNS`]) and the
//! numeric projection is generated from it field by field.
//!
//! Missing-value policy: numeric gaps become 0.0 only here, at the final
//! projection, never earlier. An earlier fill would let the reconstructor
//! mistake the zero for a real historical observation.

use counter_data::calendar::CalendarFeatures;
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::features::LagFeatures;
use crate::weather::WeatherFeatures;

/// The numeric feature schema, in the exact order the predictor consumes.
/// counter_id is carried alongside but never enters the numeric projection.
pub const FEATURE_COLUMNS: [&str; 13] = [
    "rolling_7d",
    "rolling_28d",
    "lag_7d",
    "lag_28d",
    "temperature",
    "rain",
    "is_rainy",
    "hour",
    "day",
    "month",
    "year",
    "weekday",
    "is_weekend",
];

/// Assembled features for one counter and one target date.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Opaque identifier, reattached to the forecast record downstream.
    pub counter_id: String,
    pub rolling_7d: Option<f64>,
    pub rolling_28d: Option<f64>,
    pub lag_7d: Option<f64>,
    pub lag_28d: Option<f64>,
    pub temperature: Option<f64>,
    pub rain: f64,
    pub is_rainy: bool,
    pub calendar: CalendarFeatures,
}

impl FeatureVector {
    /// Combine the reconstructed fragments into one vector.
    ///
    /// Fails with `MissingFeature` when reconstruction produced nothing
    /// usable: all four lag/rolling features missing, or no temperature
    /// ever observed at the counter's coordinates.
    pub fn assemble(
        counter_id: impl Into<String>,
        calendar: CalendarFeatures,
        lags: LagFeatures,
        weather: WeatherFeatures,
    ) -> Result<Self> {
        let counter_id = counter_id.into();

        if lags.is_all_missing() {
            return Err(EngineError::MissingFeature {
                counter_id,
                detail: "no lag or rolling feature could be reconstructed from the trailing window"
                    .to_string(),
            });
        }
        if weather.temperature.is_none() {
            return Err(EngineError::MissingFeature {
                counter_id,
                detail: "no temperature ever observed at these coordinates".to_string(),
            });
        }

        Ok(Self {
            counter_id,
            rolling_7d: lags.rolling_7d,
            rolling_28d: lags.rolling_28d,
            lag_7d: lags.lag_7d,
            lag_28d: lags.lag_28d,
            temperature: weather.temperature,
            rain: weather.rain,
            is_rainy: weather.is_rainy,
            calendar,
        })
    }

    /// Numeric projection in [`FEATURE_COLUMNS`] order. Remaining gaps are
    /// filled with 0.0 here and only here.
    pub fn to_numeric(&self) -> Vec<f64> {
        vec![
            self.rolling_7d.unwrap_or(0.0),
            self.rolling_28d.unwrap_or(0.0),
            self.lag_7d.unwrap_or(0.0),
            self.lag_28d.unwrap_or(0.0),
            self.temperature.unwrap_or(0.0),
            self.rain,
            f64::from(u8::from(self.is_rainy)),
            f64::from(self.calendar.hour),
            f64::from(self.calendar.day),
            f64::from(self.calendar.month),
            f64::from(self.calendar.year),
            f64::from(self.calendar.weekday),
            f64::from(u8::from(self.calendar.is_weekend)),
        ]
    }
}

/// Coerce an inbound JSON value to f64. Numbers and numeric strings pass,
/// booleans map to 1.0/0.0, anything else is missing.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

/// Apply explicit point-query calendar overrides on top of the derived
/// calendar features. A value that fails coercion is treated as missing and
/// leaves the derived value in place; an unknown key is a request error.
pub fn apply_calendar_overrides(base: CalendarFeatures, overrides: &Value) -> Result<CalendarFeatures> {
    let map = overrides.as_object().ok_or_else(|| {
        EngineError::Data("calendar overrides must be a JSON object".to_string())
    })?;

    let mut calendar = base;
    for (key, value) in map {
        let numeric = coerce_numeric(value);
        match (key.as_str(), numeric) {
            ("year", Some(n)) => calendar.year = n as i32,
            ("month", Some(n)) => calendar.month = n as u32,
            ("day", Some(n)) => calendar.day = n as u32,
            ("hour", Some(n)) => calendar.hour = n as u32,
            ("weekday", Some(n)) => calendar.weekday = n as u32,
            ("is_weekend", Some(n)) => calendar.is_weekend = n != 0.0,
            ("year" | "month" | "day" | "hour" | "weekday" | "is_weekend", None) => {}
            (other, _) => {
                return Err(EngineError::Data(format!(
                    "unknown calendar override: {other}"
                )))
            }
        }
    }

    Ok(calendar)
}
