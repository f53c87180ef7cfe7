// End-to-end forecast run over in-memory stores: three counters (two
// sharing a rounded coordinate), 28 days of synthetic history, a linear
// baseline predictor, one batch run and one point query with a calendar
// override.

use chrono::{Datelike, Duration, NaiveDate};
use counter_data::types::{Counter, CounterObservation, WeatherSample};
use forecast_engine::predictor::LinearPredictor;
use forecast_engine::runner::ForecastEngine;
use forecast_engine::store::{MemoryForecastStore, MemoryObservationStore, MemoryWeatherStore};
use serde_json::json;

fn main() {
    let target = NaiveDate::from_ymd_opt(2025, 12, 10).expect("valid date");
    let counters = vec![
        Counter::new("urn:counter:albert-1er", 43.611, 3.877),
        Counter::new("urn:counter:berracasa", 43.612, 3.879),
        Counter::new("urn:counter:lattes", 43.57, 3.91),
    ];

    let observations = MemoryObservationStore::new();
    for counter in &counters {
        for days_before in 1..=28 {
            let date = target - Duration::days(days_before);
            // Weekends see twice the weekday traffic.
            let weekend = date.weekday().num_days_from_monday() >= 5;
            let intensity = if weekend { 240 } else { 120 };
            observations
                .insert(CounterObservation::new(counter.id.clone(), date, intensity))
                .expect("in-memory insert");
        }
    }

    let weather = MemoryWeatherStore::new();
    for counter in &counters {
        weather
            .insert(WeatherSample {
                coordinates: counter.coordinates,
                date: target,
                temperature: Some(8.5),
                rain: 0.2,
            })
            .expect("in-memory insert");
    }

    let forecasts = MemoryForecastStore::new();
    let predictor = LinearPredictor::seasonal_baseline();
    let engine = ForecastEngine::new(&observations, &weather, &forecasts, &predictor)
        .expect("schema validated");

    println!("Running batch forecast for {target}...");
    let report = engine
        .run_batch(&counters, target)
        .expect("batch run succeeds");
    println!(
        "Forecasts written: {}, counters skipped: {}",
        report.forecasts,
        report.skipped.len()
    );

    for counter in &counters {
        if let Some(record) = forecasts.get(&counter.id, target).expect("store read") {
            println!("  {} -> {:.2}", record.counter_id, record.forecast);
        }
    }

    println!("\nPoint query with an hour override:");
    let record = engine
        .forecast_at(&counters[0], target, Some(&json!({"hour": 17})))
        .expect("point query succeeds");
    match record {
        Some(record) => println!("  {} -> {:.2}", record.counter_id, record.forecast),
        None => println!("  no forecast available"),
    }
}
