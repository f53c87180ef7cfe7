//! Calendar feature extraction
//!
//! Derives the calendar columns of the feature schema from a date. Pure and
//! infallible for any valid chrono date.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Weekdays counted as weekend (0 = Monday .. 6 = Sunday)
const WEEKEND_DAYS: [u32; 2] = [5, 6];

/// Calendar-derived features for one date (or date + hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFeatures {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Hour of day, 0 for date-only inputs
    pub hour: u32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u32,
    pub is_weekend: bool,
}

impl CalendarFeatures {
    /// Extract features from a date; `hour` is 0.
    pub fn from_date(date: NaiveDate) -> Self {
        let weekday = date.weekday().num_days_from_monday();
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: 0,
            weekday,
            is_weekend: WEEKEND_DAYS.contains(&weekday),
        }
    }

    /// Extract features from a datetime for intraday variants.
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self {
            hour: datetime.hour(),
            ..Self::from_date(datetime.date())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn wednesday_features() {
        let features = CalendarFeatures::from_date(date(2025, 12, 10));
        assert_eq!(features.year, 2025);
        assert_eq!(features.month, 12);
        assert_eq!(features.day, 10);
        assert_eq!(features.hour, 0);
        assert_eq!(features.weekday, 2);
        assert!(!features.is_weekend);
    }

    #[test]
    fn saturday_and_sunday_are_weekend() {
        assert!(CalendarFeatures::from_date(date(2025, 12, 6)).is_weekend);
        assert!(CalendarFeatures::from_date(date(2025, 12, 7)).is_weekend);
        assert!(!CalendarFeatures::from_date(date(2025, 12, 8)).is_weekend);
    }

    #[test]
    fn datetime_carries_the_hour() {
        let datetime = date(2025, 12, 10).and_hms_opt(17, 0, 0).unwrap();
        let features = CalendarFeatures::from_datetime(datetime);
        assert_eq!(features.hour, 17);
        assert_eq!(features.weekday, 2);
    }
}
