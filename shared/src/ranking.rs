//! Alternative-date recommendations
//!
//! Scores the days around an event's date and keeps those at least as
//! suitable as the original, best first.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::models::{AlternativeCandidate, ForecastSample, ForecastSeries, SuitabilityResult};
use crate::scoring::SuitabilityScorer;
use crate::selection::select_sample_for_date;

/// Forecast horizon of the 5-day/3-hour provider, in days
pub const DEFAULT_HORIZON_DAYS: i64 = 5;

/// Day offsets around the original date that are considered
pub const CANDIDATE_OFFSETS: [i64; 5] = [-2, -1, 0, 1, 2];

/// Whether `date` lies within `[today, today + horizon_days]`.
///
/// The upper bound saturates at `NaiveDate::MAX` when the horizon is too
/// large to represent. A negative horizon admits nothing.
pub fn is_admissible(date: NaiveDate, today: NaiveDate, horizon_days: i64) -> bool {
    if horizon_days < 0 {
        return false;
    }
    let last_day = Duration::try_days(horizon_days)
        .and_then(|horizon| today.checked_add_signed(horizon))
        .unwrap_or(NaiveDate::MAX);
    date >= today && date <= last_day
}

impl SuitabilityScorer {
    /// Rank the dates within two days of `original_date`.
    ///
    /// The original date's score is the baseline (0 if the series has no
    /// sample for it). Candidates outside the admissibility window or without
    /// a sample are skipped. The result holds every candidate scoring at
    /// least the baseline, sorted by score descending with ties kept in date
    /// order, one entry per date.
    pub fn rank_alternatives(
        &self,
        series: &ForecastSeries,
        category: &str,
        original_date: NaiveDate,
        today: NaiveDate,
        horizon_days: i64,
    ) -> Vec<AlternativeCandidate> {
        rank_by(series, original_date, today, horizon_days, |sample| {
            self.score(category, sample)
        })
    }
}

/// Rank alternatives with the built-in category table and the default horizon
pub fn rank_alternatives(
    series: &ForecastSeries,
    category: &str,
    original_date: NaiveDate,
    today: NaiveDate,
) -> Vec<AlternativeCandidate> {
    SuitabilityScorer::default().rank_alternatives(
        series,
        category,
        original_date,
        today,
        DEFAULT_HORIZON_DAYS,
    )
}

fn rank_by<F>(
    series: &ForecastSeries,
    original_date: NaiveDate,
    today: NaiveDate,
    horizon_days: i64,
    score: F,
) -> Vec<AlternativeCandidate>
where
    F: Fn(&ForecastSample) -> SuitabilityResult,
{
    let baseline = select_sample_for_date(series, original_date)
        .map(|sample| score(sample).score)
        .unwrap_or(0);

    let mut candidates: Vec<AlternativeCandidate> = CANDIDATE_OFFSETS
        .iter()
        .filter_map(|offset| original_date.checked_add_signed(Duration::days(*offset)))
        .filter(|date| is_admissible(*date, today, horizon_days))
        .filter_map(|date| {
            let sample = select_sample_for_date(series, date)?;
            Some(AlternativeCandidate {
                date,
                result: score(sample),
                sample: sample.clone(),
            })
        })
        .filter(|candidate| candidate.score() >= baseline)
        .collect();

    // Stable sort: equal scores stay in date order
    candidates.sort_by(|a, b| b.score().cmp(&a.score()));

    let mut seen = HashSet::new();
    candidates.retain(|candidate| seen.insert(candidate.date));
    candidates
}
