//! Trailing window over daily observations for a single counter
//!
//! Feature reconstruction always works on one counter at a time; building a
//! [`TrailingWindow`] with [`TrailingWindow::for_counter`] performs that
//! filter once, before any date arithmetic happens.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::CounterObservation;

/// Per-counter date-ordered view over daily intensities.
///
/// Duplicate dates keep the first row seen, preserving the invariant of at
/// most one observation per (counter_id, date).
#[derive(Debug, Clone, Default)]
pub struct TrailingWindow {
    counter_id: String,
    values: BTreeMap<NaiveDate, u32>,
}

impl TrailingWindow {
    /// Build a window holding only the rows belonging to `counter_id`.
    pub fn for_counter(counter_id: &str, observations: &[CounterObservation]) -> Self {
        let mut values = BTreeMap::new();
        for obs in observations.iter().filter(|o| o.counter_id == counter_id) {
            values.entry(obs.date).or_insert(obs.intensity);
        }

        Self {
            counter_id: counter_id.to_string(),
            values,
        }
    }

    pub fn counter_id(&self) -> &str {
        &self.counter_id
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Intensity observed on an exact date, if any.
    pub fn intensity_on(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).map(|v| f64::from(*v))
    }

    /// Intensities observed within `[start, end]`, in date order.
    pub fn intensities_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<f64> {
        self.values
            .range(start..=end)
            .map(|(_, v)| f64::from(*v))
            .collect()
    }
}
