//! Forecast run orchestration
//!
//! One engine invocation per counter per forecast date. The batch mode fans
//! out over the selected counters in parallel: reconstructions are
//! independent, the collaborators only serve concurrent reads, and a single
//! counter's failure is recorded and skipped rather than aborting the run.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use counter_data::calendar::CalendarFeatures;
use counter_data::types::{Counter, ForecastRecord, RoundedCoordinates};
use counter_data::window::TrailingWindow;
use rayon::prelude::*;
use serde_json::Value;

use crate::assemble::{apply_calendar_overrides, FeatureVector};
use crate::error::{EngineError, Result};
use crate::features::LagFeatures;
use crate::predictor::{validate_schema, Predictor};
use crate::store::{ForecastStore, ObservationStore, WeatherStore};
use crate::weather::WeatherFeatures;

/// Trailing lookback available at forecast time.
pub const WINDOW_DAYS: i64 = 28;
const UPSERT_ATTEMPTS: u32 = 3;
const UPSERT_BACKOFF: std::time::Duration = std::time::Duration::from_millis(100);

/// A counter left out of a batch run, with the reason it was skipped.
#[derive(Debug, Clone)]
pub struct SkippedCounter {
    pub counter_id: String,
    pub reason: String,
}

/// Outcome of a batch run: forecasts written vs counters skipped.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub forecasts: usize,
    pub skipped: Vec<SkippedCounter>,
}

/// The reconstruction engine wired to its four collaborators.
pub struct ForecastEngine<'a> {
    observations: &'a dyn ObservationStore,
    weather: &'a dyn WeatherStore,
    forecasts: &'a dyn ForecastStore,
    predictor: &'a dyn Predictor,
}

impl<'a> ForecastEngine<'a> {
    /// Wire up the engine, validating the predictor's schema immediately:
    /// a column mismatch must abort before any counter is processed.
    pub fn new(
        observations: &'a dyn ObservationStore,
        weather: &'a dyn WeatherStore,
        forecasts: &'a dyn ForecastStore,
        predictor: &'a dyn Predictor,
    ) -> Result<Self> {
        validate_schema(predictor)?;

        Ok(Self {
            observations,
            weather,
            forecasts,
            predictor,
        })
    }

    /// Forecast `target` for every counter in the set.
    ///
    /// Issues one trailing-window query for all counters and one weather
    /// lookup per distinct rounded coordinate, then reconstructs and
    /// predicts per counter in parallel. Missing features are always
    /// per-counter skips; the run itself fails only when every counter
    /// failed with an upstream outage.
    pub fn run_batch(&self, counters: &[Counter], target: NaiveDate) -> Result<RunReport> {
        if counters.is_empty() {
            return Ok(RunReport::default());
        }

        let since = target - Duration::days(WINDOW_DAYS);
        let ids: Vec<String> = counters.iter().map(|c| c.id.clone()).collect();
        let rows = self.observations.trailing_window(&ids, since)?;

        // Counters sharing a rounded coordinate share one upstream query.
        let mut weather_by_coords: HashMap<
            RoundedCoordinates,
            std::result::Result<WeatherFeatures, String>,
        > = HashMap::new();
        for counter in counters {
            weather_by_coords.entry(counter.coordinates).or_insert_with(|| {
                WeatherFeatures::join(self.weather, counter.coordinates, target)
                    .map_err(|e| e.to_string())
            });
        }

        let calendar = CalendarFeatures::from_date(target);
        let outcomes: Vec<std::result::Result<ForecastRecord, (SkippedCounter, bool)>> = counters
            .par_iter()
            .map(|counter| {
                // Skips carry whether the cause was an upstream outage.
                let skip = |reason: String, upstream: bool| {
                    (
                        SkippedCounter {
                            counter_id: counter.id.clone(),
                            reason,
                        },
                        upstream,
                    )
                };
                let weather = match weather_by_coords.get(&counter.coordinates) {
                    Some(Ok(weather)) => *weather,
                    Some(Err(reason)) => return Err(skip(reason.clone(), true)),
                    None => {
                        return Err(skip("no weather lookup for coordinates".to_string(), true))
                    }
                };
                let window = TrailingWindow::for_counter(&counter.id, &rows);
                self.forecast_one(counter, target, calendar, &window, weather)
                    .map_err(|e| {
                        let upstream = matches!(e, EngineError::UpstreamUnavailable(_));
                        skip(e.to_string(), upstream)
                    })
            })
            .collect();

        let mut report = RunReport::default();
        let mut all_upstream = true;
        for outcome in outcomes {
            match outcome {
                Ok(_) => report.forecasts += 1,
                Err((skipped, upstream)) => {
                    all_upstream &= upstream;
                    report.skipped.push(skipped);
                }
            }
        }

        if report.forecasts == 0 && all_upstream {
            let first = report
                .skipped
                .first()
                .map(|s| format!("{}: {}", s.counter_id, s.reason))
                .unwrap_or_default();
            return Err(EngineError::BatchFailed(format!(
                "upstream failures skipped all {} counters (first: {first})",
                counters.len()
            )));
        }

        Ok(report)
    }

    /// Forecast one counter at one date, optionally with explicit calendar
    /// overrides as a JSON object.
    ///
    /// Returns `Ok(None)` when reconstruction fails: "no forecast
    /// available" must stay distinguishable from a real zero-traffic
    /// prediction.
    pub fn forecast_at(
        &self,
        counter: &Counter,
        target: NaiveDate,
        overrides: Option<&Value>,
    ) -> Result<Option<ForecastRecord>> {
        let since = target - Duration::days(WINDOW_DAYS);
        let rows = self
            .observations
            .trailing_window(std::slice::from_ref(&counter.id), since)?;
        let window = TrailingWindow::for_counter(&counter.id, &rows);

        let mut calendar = CalendarFeatures::from_date(target);
        if let Some(value) = overrides {
            calendar = apply_calendar_overrides(calendar, value)?;
        }
        let weather = WeatherFeatures::join(self.weather, counter.coordinates, target)?;

        match self.forecast_one(counter, target, calendar, &window, weather) {
            Ok(record) => Ok(Some(record)),
            Err(EngineError::MissingFeature { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Shared reconstruction path for both invocation modes.
    fn forecast_one(
        &self,
        counter: &Counter,
        target: NaiveDate,
        calendar: CalendarFeatures,
        window: &TrailingWindow,
        weather: WeatherFeatures,
    ) -> Result<ForecastRecord> {
        let lags = LagFeatures::reconstruct(window, target);
        let features = FeatureVector::assemble(&counter.id, calendar, lags, weather)?;
        let forecast = self.predictor.predict(&features.to_numeric())?;

        let record = ForecastRecord {
            counter_id: counter.id.clone(),
            date: target,
            forecast,
        };
        self.upsert_with_retry(&record)?;

        Ok(record)
    }

    fn upsert_with_retry(&self, record: &ForecastRecord) -> Result<()> {
        let mut last_err = EngineError::UpstreamUnavailable("forecast upsert never ran".to_string());
        for attempt in 0..UPSERT_ATTEMPTS {
            if attempt > 0 {
                std::thread::sleep(UPSERT_BACKOFF * attempt);
            }
            match self.forecasts.upsert(record.clone()) {
                Ok(()) => return Ok(()),
                Err(err) => last_err = err,
            }
        }

        Err(last_err)
    }
}
