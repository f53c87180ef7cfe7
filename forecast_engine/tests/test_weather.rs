use chrono::{Duration, NaiveDate};
use counter_data::types::{RoundedCoordinates, WeatherSample};
use forecast_engine::store::MemoryWeatherStore;
use forecast_engine::weather::WeatherFeatures;
use rstest::rstest;

fn target() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 10).unwrap()
}

fn coords() -> RoundedCoordinates {
    RoundedCoordinates::new(43.61, 3.88)
}

fn store_with(samples: &[WeatherSample]) -> MemoryWeatherStore {
    let store = MemoryWeatherStore::new();
    for sample in samples {
        store.insert(*sample).unwrap();
    }
    store
}

#[test]
fn same_day_sample_joins_directly() {
    let store = store_with(&[WeatherSample {
        coordinates: coords(),
        date: target(),
        temperature: Some(8.5),
        rain: 2.4,
    }]);

    let features = WeatherFeatures::join(&store, coords(), target()).unwrap();

    assert_eq!(features.temperature, Some(8.5));
    assert_eq!(features.rain, 2.4);
    assert!(features.is_rainy);
}

#[test]
fn temperature_forward_fills_from_the_last_known_day() {
    let store = store_with(&[
        WeatherSample {
            coordinates: coords(),
            date: target() - Duration::days(3),
            temperature: Some(6.0),
            rain: 1.0,
        },
        WeatherSample {
            coordinates: coords(),
            date: target() - Duration::days(1),
            temperature: Some(7.5),
            rain: 0.0,
        },
    ]);

    let features = WeatherFeatures::join(&store, coords(), target()).unwrap();

    // Temperature carried forward from the most recent sample; rain is a
    // same-day sum and defaults to 0 instead.
    assert_eq!(features.temperature, Some(7.5));
    assert_eq!(features.rain, 0.0);
    assert!(!features.is_rainy);
}

#[test]
fn same_day_rain_survives_a_null_temperature() {
    let store = store_with(&[
        WeatherSample {
            coordinates: coords(),
            date: target() - Duration::days(2),
            temperature: Some(4.0),
            rain: 0.0,
        },
        WeatherSample {
            coordinates: coords(),
            date: target(),
            temperature: None,
            rain: 3.2,
        },
    ]);

    let features = WeatherFeatures::join(&store, coords(), target()).unwrap();

    assert_eq!(features.rain, 3.2);
    assert!(features.is_rainy);
    assert_eq!(features.temperature, Some(4.0));
}

#[test]
fn unseen_coordinates_yield_missing_temperature() {
    let store = store_with(&[]);

    let features = WeatherFeatures::join(&store, coords(), target()).unwrap();

    assert_eq!(features.temperature, None);
    assert_eq!(features.rain, 0.0);
    assert!(!features.is_rainy);
}

#[rstest]
#[case(0.099, false)]
#[case(0.1, true)]
#[case(0.2, true)]
#[case(0.0, false)]
fn rainy_boundary_is_inclusive(#[case] rain: f64, #[case] expected: bool) {
    let store = store_with(&[WeatherSample {
        coordinates: coords(),
        date: target(),
        temperature: Some(10.0),
        rain,
    }]);

    let features = WeatherFeatures::join(&store, coords(), target()).unwrap();

    assert_eq!(features.is_rainy, expected);
}

#[test]
fn other_coordinates_do_not_leak() {
    let elsewhere = RoundedCoordinates::new(48.85, 2.35);
    let store = store_with(&[WeatherSample {
        coordinates: elsewhere,
        date: target(),
        temperature: Some(12.0),
        rain: 5.0,
    }]);

    let features = WeatherFeatures::join(&store, coords(), target()).unwrap();

    assert_eq!(features.temperature, None);
    assert_eq!(features.rain, 0.0);
}
