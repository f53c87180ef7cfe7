//! # Velo Forecast
//!
//! Daily bicycle-traffic forecasting for a city's counter network. This
//! facade re-exports the workspace crates:
//!
//! - [`counter_data`]: domain types, calendar features, trailing windows
//!   and CSV ingestion
//! - [`traffic_math`]: windowed statistics for count series
//! - [`forecast_engine`]: lag/rolling feature reconstruction, weather
//!   join, feature assembly and the batch/point-query runner
//!
//! See `demos/forecast_day.rs` for an end-to-end run over in-memory
//! stores.

pub use counter_data;
pub use forecast_engine;
pub use traffic_math;
