//! # Counter Data
//!
//! Domain types for daily bicycle-counter data: counters and their rounded
//! coordinates, daily intensity observations, trailing windows, weather
//! samples and forecast records, plus calendar feature extraction and CSV
//! ingestion.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use counter_data::calendar::CalendarFeatures;
//!
//! let date = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
//! let features = CalendarFeatures::from_date(date);
//! assert_eq!(features.weekday, 2); // a Wednesday
//! assert!(!features.is_weekend);
//! ```

use chrono::NaiveDate;
use thiserror::Error;

pub mod calendar;
pub mod ingest;
pub mod types;
pub mod window;

pub use calendar::CalendarFeatures;
pub use types::{Counter, CounterObservation, ForecastRecord, RoundedCoordinates, WeatherSample};
pub use window::TrailingWindow;

/// Errors raised when loading or validating counter data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate observation for counter {counter_id} on {date}")]
    DuplicateObservation { counter_id: String, date: NaiveDate },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for counter data operations
pub type Result<T> = std::result::Result<T, DataError>;
