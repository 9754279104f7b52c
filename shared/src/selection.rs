//! Picks the forecast sample that represents a calendar date

use chrono::{NaiveDate, Timelike};

use crate::models::{ForecastSample, ForecastSeries};

const NOON_NANOS: i64 = 12 * 3600 * 1_000_000_000;

/// Absolute distance of the sample's time-of-day from 12:00:00 UTC, in nanoseconds
fn distance_from_noon(sample: &ForecastSample) -> i64 {
    let time = sample.forecast_time.time();
    let nanos = i64::from(time.num_seconds_from_midnight()) * 1_000_000_000
        + i64::from(time.nanosecond());
    (nanos - NOON_NANOS).abs()
}

/// Select the sample on `target_date` (UTC) closest to noon.
///
/// Scans the whole series, so the input need not be sorted. On an exact tie
/// the sample that appears first in the series wins. Returns `None` when the
/// series has nothing for that date.
pub fn select_sample_for_date(
    series: &ForecastSeries,
    target_date: NaiveDate,
) -> Option<&ForecastSample> {
    series
        .iter()
        .filter(|sample| sample.date() == target_date)
        .fold(None::<(&ForecastSample, i64)>, |best, sample| {
            let distance = distance_from_noon(sample);
            match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((sample, distance)),
            }
        })
        .map(|(sample, _)| sample)
}
