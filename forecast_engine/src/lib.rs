//! # Forecast Engine
//!
//! Feature reconstruction engine for daily bicycle-traffic forecasting.
//! Given a short trailing window of historical daily counts per counter,
//! it rebuilds the exact lagged/rolling features a trained regression
//! model expects at inference time, tolerating missing days, partial
//! windows and counter-specific gaps.
//!
//! ## Features
//!
//! - Lag-7/lag-28 reconstruction with fallback search over older proxies
//! - Rolling 7-day and 28-day means with minimum-observation thresholds
//! - Weather join (temperature forward-fill, rain default, rainy flag)
//! - Fixed-order feature vector assembly with a late missing-value policy
//! - Batch fan-out over counters with per-counter skip-and-record
//! - Token-bucket rate limiting for the upstream weather archive
//!
//! ## Quick start
//!
//! ```
//! use chrono::NaiveDate;
//! use counter_data::types::{Counter, CounterObservation, WeatherSample};
//! use forecast_engine::predictor::LinearPredictor;
//! use forecast_engine::runner::ForecastEngine;
//! use forecast_engine::store::{
//!     MemoryForecastStore, MemoryObservationStore, MemoryWeatherStore,
//! };
//!
//! let target = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
//! let counter = Counter::new("C1", 43.61, 3.88);
//!
//! let observations = MemoryObservationStore::new();
//! for days_before in 1..=28 {
//!     let date = target - chrono::Duration::days(days_before);
//!     observations
//!         .insert(CounterObservation::new("C1", date, 100))
//!         .unwrap();
//! }
//!
//! let weather = MemoryWeatherStore::new();
//! weather
//!     .insert(WeatherSample {
//!         coordinates: counter.coordinates,
//!         date: target,
//!         temperature: Some(8.5),
//!         rain: 0.0,
//!     })
//!     .unwrap();
//!
//! let forecasts = MemoryForecastStore::new();
//! let predictor = LinearPredictor::seasonal_baseline();
//! let engine =
//!     ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
//!
//! let report = engine.run_batch(&[counter], target).unwrap();
//! assert_eq!(report.forecasts, 1);
//! assert!(report.skipped.is_empty());
//! ```

pub mod assemble;
pub mod error;
pub mod features;
pub mod open_meteo;
pub mod predictor;
pub mod rate_limit;
pub mod runner;
pub mod store;
pub mod weather;

pub use assemble::{FeatureVector, FEATURE_COLUMNS};
pub use error::{EngineError, Result};
pub use features::LagFeatures;
pub use runner::{ForecastEngine, RunReport, SkippedCounter};
pub use weather::{WeatherFeatures, RAIN_THRESHOLD};
