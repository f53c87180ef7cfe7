//! Open-Meteo archive client
//!
//! Implements the [`WeatherStore`] contract against the Open-Meteo daily
//! aggregate endpoint (`daily=rain_sum,temperature_2m_mean`), one query per
//! rounded coordinate. Calls pass through the rate limiter and are retried
//! a bounded number of times with linear backoff before the counter is
//! given up on.

use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use counter_data::types::{RoundedCoordinates, WeatherSample};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::rate_limit::RateLimiter;
use crate::store::WeatherStore;

const BASE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const DAILY_FIELDS: &str = "rain_sum,temperature_2m_mean";
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_millis(100);
/// Upstream call budget per rolling minute.
const CALLS_PER_MINUTE: u32 = 60;
/// How far back `latest_before` looks when forward-filling temperature.
const FFILL_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    rain_sum: Vec<Option<f64>>,
    temperature_2m_mean: Vec<Option<f64>>,
}

impl DailyBlock {
    /// Sample for a day the archive reported on. Either aggregate can be
    /// null independently: a known rain sum must survive a null
    /// temperature.
    fn sample_at(&self, coordinates: RoundedCoordinates, date: NaiveDate) -> Option<WeatherSample> {
        let idx = self.time.iter().position(|d| *d == date)?;
        let temperature = self.temperature_2m_mean.get(idx).copied().flatten();
        let rain = self.rain_sum.get(idx).copied().flatten().unwrap_or(0.0);

        Some(WeatherSample {
            coordinates,
            date,
            temperature,
            rain,
        })
    }
}

/// Blocking client for the Open-Meteo daily archive.
pub struct OpenMeteoClient {
    client: Client,
    limiter: RateLimiter,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Point the client at a different endpoint, e.g. a local stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            limiter: RateLimiter::per_minute(CALLS_PER_MINUTE)?,
            base_url: base_url.into(),
        })
    }

    fn fetch_range(
        &self,
        coordinates: RoundedCoordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailyBlock> {
        let url = format!(
            "{}?latitude={:.2}&longitude={:.2}&start_date={}&end_date={}&daily={}",
            self.base_url,
            coordinates.latitude(),
            coordinates.longitude(),
            start,
            end,
            DAILY_FIELDS
        );

        let mut last_err = EngineError::UpstreamUnavailable("weather fetch never ran".to_string());
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                thread::sleep(BACKOFF_STEP * attempt);
            }
            self.limiter.acquire();
            match self.try_fetch(&url) {
                Ok(response) => return Ok(response.daily),
                Err(err) => last_err = err,
            }
        }

        Err(last_err)
    }

    fn try_fetch(&self, url: &str) -> Result<DailyResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| EngineError::UpstreamUnavailable(e.to_string()))?;

        response
            .json::<DailyResponse>()
            .map_err(|e| EngineError::UpstreamUnavailable(e.to_string()))
    }
}

impl WeatherStore for OpenMeteoClient {
    fn daily(
        &self,
        coordinates: RoundedCoordinates,
        date: NaiveDate,
    ) -> Result<Option<WeatherSample>> {
        let block = self.fetch_range(coordinates, date, date)?;
        Ok(block.sample_at(coordinates, date))
    }

    fn latest_before(
        &self,
        coordinates: RoundedCoordinates,
        date: NaiveDate,
    ) -> Result<Option<WeatherSample>> {
        let end = date - chrono::Duration::days(1);
        let start = date - chrono::Duration::days(FFILL_LOOKBACK_DAYS);
        let block = self.fetch_range(coordinates, start, end)?;

        // Walk back from the most recent day, skipping days whose
        // temperature aggregate is null.
        let mut days: Vec<NaiveDate> = block.time.clone();
        days.sort();
        Ok(days.into_iter().rev().find_map(|day| {
            block
                .sample_at(coordinates, day)
                .filter(|sample| sample.temperature.is_some())
        }))
    }
}
