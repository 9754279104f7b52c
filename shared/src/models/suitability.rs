//! Suitability scoring results

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::weather::ForecastSample;

/// Breakdown key carrying the pre-clamp total
pub const FINAL_SCORE_RAW: &str = "final_score_raw";
/// Breakdown key carrying the clamped total
pub const FINAL_SCORE_NORMALIZED: &str = "final_score_normalized";

/// One named contribution to a suitability score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownEntry {
    /// Factor name, e.g. `temperature_score` or `wedding_adjustment`
    pub factor: String,
    /// Signed points added (bands) or removed (category adjustments)
    pub points: i32,
    /// Short human-readable reason, e.g. `Ideal`
    pub qualifier: String,
}

impl BreakdownEntry {
    pub fn new(factor: impl Into<String>, points: i32, qualifier: impl Into<String>) -> Self {
        Self {
            factor: factor.into(),
            points,
            qualifier: qualifier.into(),
        }
    }
}

/// Rendered as `+30 (Ideal)`, `0 (Extreme)` or `-15 (Rain for Wedding)`
impl std::fmt::Display for BreakdownEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.points > 0 {
            write!(f, "+{} ({})", self.points, self.qualifier)
        } else {
            write!(f, "{} ({})", self.points, self.qualifier)
        }
    }
}

/// Ordered explanation of a suitability score.
///
/// Serializes to a flat JSON object: one string per factor in the order the
/// factors were applied, followed by `final_score_raw` and
/// `final_score_normalized` as integers. UIs display these verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub entries: Vec<BreakdownEntry>,
    pub raw_total: i32,
    pub normalized_total: i32,
}

impl Breakdown {
    /// Look up the rendered contribution for a factor
    pub fn get(&self, factor: &str) -> Option<&BreakdownEntry> {
        self.entries.iter().find(|e| e.factor == factor)
    }

    pub fn contains(&self, factor: &str) -> bool {
        self.get(factor).is_some()
    }

    /// Factor names followed by the two total keys, in output order
    pub fn keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.factor.as_str())
            .chain([FINAL_SCORE_RAW, FINAL_SCORE_NORMALIZED])
            .collect()
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 2))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.factor, &entry.to_string())?;
        }
        map.serialize_entry(FINAL_SCORE_RAW, &self.raw_total)?;
        map.serialize_entry(FINAL_SCORE_NORMALIZED, &self.normalized_total)?;
        map.end()
    }
}

/// Score (0-100) and the breakdown that produced it
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SuitabilityResult {
    pub score: i32,
    pub breakdown: Breakdown,
}

/// A nearby date evaluated by the alternative-date ranker
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeCandidate {
    pub date: NaiveDate,
    pub result: SuitabilityResult,
    /// Sample the score was computed from
    pub sample: ForecastSample,
}

impl AlternativeCandidate {
    pub fn score(&self) -> i32 {
        self.result.score
    }
}

/// Summary label shown next to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherStatus {
    /// 80+ points
    Excellent,
    /// 60-79 points
    Good,
    /// 40-59 points
    Fair,
    /// Below 40 points
    Poor,
    /// No forecast sample for the event date
    ForecastUnavailable,
    /// Forecast could not be retrieved
    Error(String),
}

impl WeatherStatus {
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            WeatherStatus::Excellent
        } else if score >= 60 {
            WeatherStatus::Good
        } else if score >= 40 {
            WeatherStatus::Fair
        } else {
            WeatherStatus::Poor
        }
    }
}

impl std::fmt::Display for WeatherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherStatus::Excellent => write!(f, "Excellent"),
            WeatherStatus::Good => write!(f, "Good"),
            WeatherStatus::Fair => write!(f, "Fair"),
            WeatherStatus::Poor => write!(f, "Poor"),
            WeatherStatus::ForecastUnavailable => write!(f, "Forecast Unavailable"),
            WeatherStatus::Error(detail) => write!(f, "Weather Error: {}", detail),
        }
    }
}

impl Serialize for WeatherStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
