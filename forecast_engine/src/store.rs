//! Collaborator contracts for the historical, weather and forecast stores
//!
//! The engine only ever needs three narrow operations from its persistence
//! collaborators: the trailing-window query, the daily weather lookup and
//! the forecast upsert. The traits here capture those contracts; the
//! in-memory implementations back tests and demos and document the expected
//! semantics (notably upsert-overwrites-by-key).

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use counter_data::types::{CounterObservation, ForecastRecord, RoundedCoordinates, WeatherSample};

use crate::error::{EngineError, Result};

/// Read path to the historical observation store.
pub trait ObservationStore: Send + Sync {
    /// Observations for the given counters with `date >= since`.
    fn trailing_window(
        &self,
        counter_ids: &[String],
        since: NaiveDate,
    ) -> Result<Vec<CounterObservation>>;
}

/// Read path to daily aggregated weather per rounded coordinate.
pub trait WeatherStore: Send + Sync {
    /// Same-day aggregate, absent on miss rather than an error.
    fn daily(
        &self,
        coordinates: RoundedCoordinates,
        date: NaiveDate,
    ) -> Result<Option<WeatherSample>>;

    /// Most recent aggregate strictly before `date` that carries a
    /// temperature reading, for forward-filling.
    fn latest_before(
        &self,
        coordinates: RoundedCoordinates,
        date: NaiveDate,
    ) -> Result<Option<WeatherSample>>;
}

/// Write path for forecast records.
pub trait ForecastStore: Send + Sync {
    /// Insert or overwrite the record keyed by (counter_id, date). Must be
    /// idempotent under retries.
    fn upsert(&self, record: ForecastRecord) -> Result<()>;
}

fn poisoned(store: &str) -> EngineError {
    EngineError::Data(format!("{store} store lock poisoned"))
}

/// In-memory observation store.
#[derive(Debug, Default)]
pub struct MemoryObservationStore {
    rows: RwLock<Vec<CounterObservation>>,
}

impl MemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<CounterObservation>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn insert(&self, observation: CounterObservation) -> Result<()> {
        let mut rows = self.rows.write().map_err(|_| poisoned("observation"))?;
        rows.push(observation);
        Ok(())
    }
}

impl ObservationStore for MemoryObservationStore {
    fn trailing_window(
        &self,
        counter_ids: &[String],
        since: NaiveDate,
    ) -> Result<Vec<CounterObservation>> {
        let rows = self.rows.read().map_err(|_| poisoned("observation"))?;
        Ok(rows
            .iter()
            .filter(|o| o.date >= since && counter_ids.contains(&o.counter_id))
            .cloned()
            .collect())
    }
}

/// In-memory weather store keyed by (coordinates, date).
#[derive(Debug, Default)]
pub struct MemoryWeatherStore {
    samples: RwLock<HashMap<(RoundedCoordinates, NaiveDate), WeatherSample>>,
}

impl MemoryWeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, sample: WeatherSample) -> Result<()> {
        let mut samples = self.samples.write().map_err(|_| poisoned("weather"))?;
        samples.insert((sample.coordinates, sample.date), sample);
        Ok(())
    }
}

impl WeatherStore for MemoryWeatherStore {
    fn daily(
        &self,
        coordinates: RoundedCoordinates,
        date: NaiveDate,
    ) -> Result<Option<WeatherSample>> {
        let samples = self.samples.read().map_err(|_| poisoned("weather"))?;
        Ok(samples.get(&(coordinates, date)).copied())
    }

    fn latest_before(
        &self,
        coordinates: RoundedCoordinates,
        date: NaiveDate,
    ) -> Result<Option<WeatherSample>> {
        let samples = self.samples.read().map_err(|_| poisoned("weather"))?;
        Ok(samples
            .values()
            .filter(|s| s.coordinates == coordinates && s.date < date && s.temperature.is_some())
            .max_by_key(|s| s.date)
            .copied())
    }
}

/// In-memory forecast store with upsert-by-key semantics.
#[derive(Debug, Default)]
pub struct MemoryForecastStore {
    records: RwLock<HashMap<(String, NaiveDate), ForecastRecord>>,
}

impl MemoryForecastStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, counter_id: &str, date: NaiveDate) -> Result<Option<ForecastRecord>> {
        let records = self.records.read().map_err(|_| poisoned("forecast"))?;
        Ok(records.get(&(counter_id.to_string(), date)).cloned())
    }

    pub fn len(&self) -> Result<usize> {
        let records = self.records.read().map_err(|_| poisoned("forecast"))?;
        Ok(records.len())
    }
}

impl ForecastStore for MemoryForecastStore {
    fn upsert(&self, record: ForecastRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| poisoned("forecast"))?;
        records.insert((record.counter_id.clone(), record.date), record);
        Ok(())
    }
}
