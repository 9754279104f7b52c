//! Forecast sample selection integration tests
//!
//! Tests for picking the sample that represents a date:
//! - Result always falls on the requested date
//! - Closest to noon wins, earliest on a tie
//! - Missing dates yield no sample

use chrono::{NaiveDate, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use shared::{select_sample_for_date, ForecastSample, ForecastSeries};

fn sample_at(day: u32, hour: u32, minute: u32) -> ForecastSample {
    ForecastSample {
        temperature: 18.0,
        feels_like: 18.0,
        min_temp: 17.0,
        max_temp: 19.0,
        pressure: 1015,
        humidity: 70,
        wind_speed: 4.0,
        wind_deg: 270,
        clouds: 40,
        weather_main: "Clouds".to_string(),
        weather_description: format!("day {} {:02}:{:02}", day, hour, minute),
        weather_icon: "03d".to_string(),
        rain_probability: 0.0,
        rain_volume_1h: 0.0,
        rain_volume_3h: 0.0,
        forecast_time: Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0).unwrap(),
    }
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

fn minutes_from_noon(sample: &ForecastSample) -> i64 {
    let time = sample.forecast_time.time();
    (i64::from(time.hour()) * 60 + i64::from(time.minute()) - 12 * 60).abs()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A full provider day at 3-hour cadence picks the 12:00 slot
    #[test]
    fn test_three_hour_cadence_picks_noon() {
        let series: ForecastSeries = (0..8).map(|slot| sample_at(10, slot * 3, 0)).collect::<Vec<_>>().into();
        let picked = select_sample_for_date(&series, june(10)).unwrap();
        assert_eq!(picked.forecast_time.hour(), 12);
    }

    /// Horizon edge: only late slots exist for the first day
    #[test]
    fn test_partial_first_day() {
        let series = ForecastSeries::new(vec![sample_at(10, 18, 0), sample_at(10, 21, 0), sample_at(11, 0, 0)]);
        let picked = select_sample_for_date(&series, june(10)).unwrap();
        assert_eq!(picked.forecast_time.hour(), 18);
    }

    /// Midnight belongs to the following date
    #[test]
    fn test_midnight_belongs_to_next_day() {
        let series = ForecastSeries::new(vec![sample_at(11, 0, 0)]);
        assert!(select_sample_for_date(&series, june(10)).is_none());
        assert!(select_sample_for_date(&series, june(11)).is_some());
    }

    /// Equidistant samples resolve to the first in series order
    #[test]
    fn test_equidistant_first_index_wins() {
        let series = ForecastSeries::new(vec![sample_at(12, 13, 30), sample_at(12, 10, 30)]);
        let picked = select_sample_for_date(&series, june(12)).unwrap();
        assert_eq!(picked.forecast_time.hour(), 13);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// (day, hour, minute) within a 5-day window
    fn slot_strategy() -> impl Strategy<Value = (u32, u32, u32)> {
        (10u32..=14, 0u32..24, prop::sample::select(vec![0u32, 30]))
    }

    fn series_strategy() -> impl Strategy<Value = Vec<(u32, u32, u32)>> {
        prop::collection::vec(slot_strategy(), 0..40)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The selected sample always falls on the target date
        #[test]
        fn prop_selected_sample_on_target_date(
            slots in series_strategy(),
            target_day in 9u32..=15
        ) {
            let series = ForecastSeries::new(
                slots.iter().map(|&(d, h, m)| sample_at(d, h, m)).collect(),
            );
            let target = june(target_day);

            match select_sample_for_date(&series, target) {
                Some(picked) => {
                    prop_assert_eq!(picked.date(), target);
                }
                None => {
                    prop_assert!(series.iter().all(|s| s.date() != target));
                }
            }
        }

        /// The selected sample is the first one at minimum distance from noon
        #[test]
        fn prop_selected_sample_minimizes_noon_distance(
            slots in series_strategy(),
            target_day in 10u32..=14
        ) {
            let series = ForecastSeries::new(
                slots.iter().map(|&(d, h, m)| sample_at(d, h, m)).collect(),
            );
            let target = june(target_day);

            let same_day: Vec<(usize, &ForecastSample)> = series
                .iter()
                .enumerate()
                .filter(|(_, s)| s.date() == target)
                .collect();

            if let Some(picked) = select_sample_for_date(&series, target) {
                let best = same_day.iter().map(|(_, s)| minutes_from_noon(s)).min().unwrap();
                prop_assert_eq!(minutes_from_noon(picked), best);

                let first_best = same_day
                    .iter()
                    .find(|(_, s)| minutes_from_noon(s) == best)
                    .map(|(i, _)| *i)
                    .unwrap();
                prop_assert!(std::ptr::eq(picked, &series.samples[first_best]));
            } else {
                prop_assert!(same_day.is_empty());
            }
        }

        /// Two same-date samples equidistant from noon return the earlier-indexed one
        #[test]
        fn prop_tie_returns_earlier_index(
            day in 10u32..=14,
            offset in 1u32..=11,
            morning_first in any::<bool>()
        ) {
            let morning = sample_at(day, 12 - offset, 0);
            let afternoon = sample_at(day, 12 + offset, 0);
            let (first, second) = if morning_first {
                (morning, afternoon)
            } else {
                (afternoon, morning)
            };
            let expected = first.forecast_time;

            let series = ForecastSeries::new(vec![first, second]);
            let picked = select_sample_for_date(&series, june(day)).unwrap();
            prop_assert_eq!(picked.forecast_time, expected);
        }
    }
}
