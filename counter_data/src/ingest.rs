//! CSV ingestion for counter data
//!
//! Loads headered CSV exports of the historical and counter tables into
//! domain records, rejecting duplicate (counter_id, date) pairs up front so
//! the one-observation-per-day invariant holds before anything downstream
//! runs date arithmetic.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::types::{Counter, CounterObservation};
use crate::{DataError, Result};

/// One row of a counters CSV: id plus raw coordinates.
#[derive(Debug, Deserialize)]
struct CounterRow {
    counter_id: String,
    latitude: f64,
    longitude: f64,
}

/// Loader for CSV exports of observations and counters
#[derive(Debug)]
pub struct CsvLoader;

impl CsvLoader {
    /// Load daily observations from a CSV with columns
    /// `counter_id,date,intensity` (ISO dates).
    pub fn observations_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<CounterObservation>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for record in reader.deserialize() {
            let obs: CounterObservation = record?;
            if !seen.insert((obs.counter_id.clone(), obs.date)) {
                return Err(DataError::DuplicateObservation {
                    counter_id: obs.counter_id,
                    date: obs.date,
                });
            }
            rows.push(obs);
        }

        Ok(rows)
    }

    /// Load tracked counters from a CSV with columns
    /// `counter_id,latitude,longitude`. Coordinates are rounded to 2
    /// decimals on the way in.
    pub fn counters_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Counter>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut counters = Vec::new();

        for record in reader.deserialize() {
            let row: CounterRow = record?;
            if row.counter_id.is_empty() {
                return Err(DataError::InvalidRecord(
                    "Counter row with empty counter_id".to_string(),
                ));
            }
            counters.push(Counter::new(row.counter_id, row.latitude, row.longitude));
        }

        Ok(counters)
    }
}
