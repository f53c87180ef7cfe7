use std::sync::atomic::{AtomicU32, Ordering};

use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, NaiveDate};
use counter_data::types::{Counter, CounterObservation, ForecastRecord, WeatherSample};
use forecast_engine::predictor::{LinearPredictor, Predictor};
use forecast_engine::runner::ForecastEngine;
use forecast_engine::store::{
    ForecastStore, MemoryForecastStore, MemoryObservationStore, MemoryWeatherStore, WeatherStore,
};
use forecast_engine::{EngineError, Result};
use serde_json::json;

fn target() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 10).unwrap()
}

/// Two counters sharing a rounded coordinate plus one on its own.
fn counters() -> Vec<Counter> {
    vec![
        Counter::new("C1", 43.611, 3.877),
        Counter::new("C2", 43.612, 3.879),
        Counter::new("C3", 43.65, 3.90),
    ]
}

fn populated_observations(counter_ids: &[&str]) -> MemoryObservationStore {
    let store = MemoryObservationStore::new();
    for id in counter_ids {
        for days_before in 1..=28 {
            let date = target() - Duration::days(days_before);
            store
                .insert(CounterObservation::new(*id, date, 100))
                .unwrap();
        }
    }
    store
}

fn populated_weather(counters: &[Counter]) -> MemoryWeatherStore {
    let store = MemoryWeatherStore::new();
    for counter in counters {
        store
            .insert(WeatherSample {
                coordinates: counter.coordinates,
                date: target(),
                temperature: Some(8.0),
                rain: 0.0,
            })
            .unwrap();
    }
    store
}

/// Weather collaborator that is down for every call.
struct UnreachableWeatherStore;

impl WeatherStore for UnreachableWeatherStore {
    fn daily(
        &self,
        _coordinates: counter_data::types::RoundedCoordinates,
        _date: NaiveDate,
    ) -> Result<Option<WeatherSample>> {
        Err(EngineError::UpstreamUnavailable(
            "weather archive unreachable".to_string(),
        ))
    }

    fn latest_before(
        &self,
        _coordinates: counter_data::types::RoundedCoordinates,
        _date: NaiveDate,
    ) -> Result<Option<WeatherSample>> {
        Err(EngineError::UpstreamUnavailable(
            "weather archive unreachable".to_string(),
        ))
    }
}

struct WrongSchemaPredictor;

impl Predictor for WrongSchemaPredictor {
    fn schema(&self) -> Vec<String> {
        vec!["lag_7d".to_string(), "rolling_7d".to_string()]
    }

    fn predict(&self, _features: &[f64]) -> Result<f64> {
        Ok(0.0)
    }
}

/// Fails the first upsert attempt for every record, then succeeds.
#[derive(Default)]
struct FlakyForecastStore {
    inner: MemoryForecastStore,
    attempts: AtomicU32,
}

impl ForecastStore for FlakyForecastStore {
    fn upsert(&self, record: ForecastRecord) -> Result<()> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(EngineError::UpstreamUnavailable(
                "transient write failure".to_string(),
            ));
        }
        self.inner.upsert(record)
    }
}

#[test]
fn batch_forecasts_every_counter() {
    let counters = counters();
    let observations = populated_observations(&["C1", "C2", "C3"]);
    let weather = populated_weather(&counters);
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let report = engine.run_batch(&counters, target()).unwrap();

    assert_eq!(report.forecasts, 3);
    assert!(report.skipped.is_empty());
    for counter in &counters {
        let record = forecasts.get(&counter.id, target()).unwrap().unwrap();
        // Flat history of 100: baseline = 0.5 * 100 + 0.5 * 100.
        assert_approx_eq!(record.forecast, 100.0);
    }
}

#[test]
fn a_poisoned_counter_is_skipped_not_fatal() {
    let counters = counters();
    // C2 has no history at all.
    let observations = populated_observations(&["C1", "C3"]);
    let weather = populated_weather(&counters);
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let report = engine.run_batch(&counters, target()).unwrap();

    assert_eq!(report.forecasts, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].counter_id, "C2");
    assert!(forecasts.get("C2", target()).unwrap().is_none());
}

#[test]
fn all_missing_history_still_reports_a_count() {
    // Fresh deployment: weather is up but no counter has any history yet.
    // Missing features are per-counter skips, so the batch reports 0/N
    // rather than failing.
    let counters = counters();
    let observations = MemoryObservationStore::new();
    let weather = populated_weather(&counters);
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let report = engine.run_batch(&counters, target()).unwrap();

    assert_eq!(report.forecasts, 0);
    assert_eq!(report.skipped.len(), 3);
}

#[test]
fn all_counters_down_on_upstream_fails_the_run() {
    let counters = counters();
    let observations = populated_observations(&["C1", "C2", "C3"]);
    let weather = UnreachableWeatherStore;
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let result = engine.run_batch(&counters, target());

    assert!(matches!(result, Err(EngineError::BatchFailed(_))));
}

#[test]
fn a_counter_without_weather_history_is_skipped() {
    // C3 sits on its own coordinate with no weather history, so its
    // temperature cannot be reconstructed; the run still reports the two
    // counters that worked.
    let counters = counters();
    let observations = populated_observations(&["C1", "C2", "C3"]);
    let weather = populated_weather(&counters[..2]);
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let report = engine.run_batch(&counters, target()).unwrap();

    assert_eq!(report.forecasts, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].counter_id, "C3");
}

#[test]
fn empty_counter_set_is_a_clean_noop() {
    let observations = MemoryObservationStore::new();
    let weather = MemoryWeatherStore::new();
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let report = engine.run_batch(&[], target()).unwrap();

    assert_eq!(report.forecasts, 0);
    assert!(report.skipped.is_empty());
}

#[test]
fn reruns_overwrite_instead_of_duplicating() {
    let counters = counters();
    let observations = populated_observations(&["C1", "C2", "C3"]);
    let weather = populated_weather(&counters);
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    engine.run_batch(&counters, target()).unwrap();
    engine.run_batch(&counters, target()).unwrap();

    assert_eq!(forecasts.len().unwrap(), 3);
}

#[test]
fn transient_upsert_failures_are_retried() {
    let counters = vec![Counter::new("C1", 43.61, 3.88)];
    let observations = populated_observations(&["C1"]);
    let weather = populated_weather(&counters);
    let forecasts = FlakyForecastStore::default();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let report = engine.run_batch(&counters, target()).unwrap();

    assert_eq!(report.forecasts, 1);
    assert!(forecasts.inner.get("C1", target()).unwrap().is_some());
}

#[test]
fn schema_mismatch_aborts_before_any_counter() {
    let observations = MemoryObservationStore::new();
    let weather = MemoryWeatherStore::new();
    let forecasts = MemoryForecastStore::new();
    let predictor = WrongSchemaPredictor;

    let result = ForecastEngine::new(&observations, &weather, &forecasts, &predictor);

    assert!(matches!(
        result.err(),
        Some(EngineError::SchemaMismatch { .. })
    ));
}

#[test]
fn point_query_matches_the_batch_path() {
    let counters = counters();
    let observations = populated_observations(&["C1", "C2", "C3"]);
    let weather = populated_weather(&counters);
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let report = engine.run_batch(&counters, target()).unwrap();
    assert_eq!(report.forecasts, 3);
    let from_batch = forecasts.get("C1", target()).unwrap().unwrap();

    let from_point = engine
        .forecast_at(&counters[0], target(), None)
        .unwrap()
        .unwrap();

    // Same reconstruction path, same column order, same number.
    assert_eq!(from_batch, from_point);
}

#[test]
fn point_query_without_history_reports_no_forecast() {
    let counters = counters();
    let observations = MemoryObservationStore::new();
    let weather = populated_weather(&counters);
    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let result = engine.forecast_at(&counters[0], target(), None).unwrap();

    // Explicitly "no forecast available", not a numeric zero.
    assert!(result.is_none());
}

#[test]
fn point_query_accepts_calendar_overrides() {
    let counters = vec![Counter::new("C1", 43.61, 3.88)];
    let observations = populated_observations(&["C1"]);
    let weather = populated_weather(&counters);
    let forecasts = MemoryForecastStore::new();
    // Weight only the hour column so the override is observable.
    let mut weights = vec![0.0; 13];
    weights[7] = 1.0;
    let predictor = LinearPredictor::new(weights, 0.0).unwrap();

    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor).unwrap();
    let derived = engine
        .forecast_at(&counters[0], target(), None)
        .unwrap()
        .unwrap();
    let overridden = engine
        .forecast_at(&counters[0], target(), Some(&json!({"hour": 17})))
        .unwrap()
        .unwrap();

    assert_approx_eq!(derived.forecast, 0.0);
    assert_approx_eq!(overridden.forecast, 17.0);
}
