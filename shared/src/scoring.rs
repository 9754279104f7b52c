//! Weather suitability scoring
//!
//! A forecast sample earns points in four independent bands (temperature,
//! precipitation, wind, sky) for a maximum of 100. Event categories with
//! their own rules then subtract penalties, each floored at zero. Every
//! contribution is recorded in the breakdown under a stable factor name.

use std::borrow::Cow;

use crate::models::{Breakdown, BreakdownEntry, ForecastSample, SkyClass, SuitabilityResult};

pub const MAX_SCORE: i32 = 100;

/// Ideal temperature range, °C (inclusive)
pub const IDEAL_TEMP_RANGE: (f64, f64) = (15.0, 30.0);
/// Width of the "acceptable" margin on either side of the ideal range, °C
pub const TEMP_TOLERANCE: f64 = 5.0;
pub const MAX_ACCEPTABLE_RAIN_PROBABILITY: f64 = 0.20;
pub const MAX_MODERATE_RAIN_PROBABILITY: f64 = 0.50;
/// km/h
pub const MAX_ACCEPTABLE_WIND_KMH: f64 = 20.0;
/// km/h
pub const MAX_MODERATE_WIND_KMH: f64 = 40.0;

// ============================================================================
// Bands
// ============================================================================

pub fn temperature_band(temperature: f64) -> BreakdownEntry {
    let (low, high) = IDEAL_TEMP_RANGE;
    let (points, qualifier) = if (low..=high).contains(&temperature) {
        (30, "Ideal")
    } else if (low - TEMP_TOLERANCE..low).contains(&temperature)
        || (temperature > high && temperature <= high + TEMP_TOLERANCE)
    {
        (15, "Acceptable")
    } else {
        (0, "Extreme")
    };
    BreakdownEntry::new("temperature_score", points, qualifier)
}

pub fn precipitation_band(rain_probability: f64) -> BreakdownEntry {
    let (points, qualifier) = if rain_probability <= MAX_ACCEPTABLE_RAIN_PROBABILITY {
        (25, "Low Rain Risk")
    } else if rain_probability <= MAX_MODERATE_RAIN_PROBABILITY {
        (10, "Moderate Rain Risk")
    } else {
        (0, "High Rain Risk")
    };
    BreakdownEntry::new("precipitation_score", points, qualifier)
}

pub fn wind_band(wind_speed_kmh: f64) -> BreakdownEntry {
    let (points, qualifier) = if wind_speed_kmh < MAX_ACCEPTABLE_WIND_KMH {
        (20, "Low Wind")
    } else if (MAX_ACCEPTABLE_WIND_KMH..MAX_MODERATE_WIND_KMH).contains(&wind_speed_kmh) {
        (10, "Moderate Wind")
    } else {
        (0, "High Wind")
    };
    BreakdownEntry::new("wind_score", points, qualifier)
}

pub fn sky_band(sky: SkyClass) -> BreakdownEntry {
    let (points, qualifier) = match sky {
        SkyClass::Fair => (25, "Clear/Cloudy"),
        SkyClass::ReducedVisibility => (5, "Sub-optimal Visibility"),
        SkyClass::Poor => (0, "Poor Sky Condition"),
    };
    BreakdownEntry::new("sky_score", points, qualifier)
}

// ============================================================================
// Category Adjustments
// ============================================================================

/// A penalty applied when its predicate holds for the sample
#[derive(Debug, Clone, Copy)]
pub struct CategoryAdjustment {
    /// Breakdown key
    pub factor: &'static str,
    /// Points removed (positive)
    pub penalty: i32,
    pub label: &'static str,
    pub applies: fn(&ForecastSample) -> bool,
}

/// Adjustments for one event category (matched case-insensitively)
#[derive(Debug, Clone)]
pub struct CategoryRules {
    pub category: Cow<'static, str>,
    pub adjustments: Cow<'static, [CategoryAdjustment]>,
}

impl CategoryRules {
    pub fn new(category: impl Into<String>, adjustments: Vec<CategoryAdjustment>) -> Self {
        Self {
            category: Cow::Owned(category.into()),
            adjustments: Cow::Owned(adjustments),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

fn sports_high_wind(sample: &ForecastSample) -> bool {
    sample.wind_speed_kmh() > 30.0
}

fn sports_non_ideal_sky(sample: &ForecastSample) -> bool {
    sample.sky_class() != SkyClass::Fair
}

fn wedding_rain(sample: &ForecastSample) -> bool {
    sample.rain_probability > 0.10
}

fn wedding_extreme_temperature(sample: &ForecastSample) -> bool {
    sample.temperature < 10.0 || sample.temperature > 35.0
}

const SPORTS_ADJUSTMENTS: &[CategoryAdjustment] = &[
    CategoryAdjustment {
        factor: "sports_adjustment",
        penalty: 15,
        label: "Very High Wind for Sports",
        applies: sports_high_wind,
    },
    CategoryAdjustment {
        factor: "sports_adjustment_sky",
        penalty: 10,
        label: "Non-ideal Sky for Sports",
        applies: sports_non_ideal_sky,
    },
];

const WEDDING_ADJUSTMENTS: &[CategoryAdjustment] = &[
    CategoryAdjustment {
        factor: "wedding_adjustment",
        penalty: 20,
        label: "Rain for Wedding",
        applies: wedding_rain,
    },
    CategoryAdjustment {
        factor: "wedding_adjustment_temp",
        penalty: 15,
        label: "Extreme Temp for Wedding",
        applies: wedding_extreme_temperature,
    },
];

/// Built-in category table
pub static DEFAULT_CATEGORY_RULES: &[CategoryRules] = &[
    CategoryRules {
        category: Cow::Borrowed("sports"),
        adjustments: Cow::Borrowed(SPORTS_ADJUSTMENTS),
    },
    CategoryRules {
        category: Cow::Borrowed("wedding"),
        adjustments: Cow::Borrowed(WEDDING_ADJUSTMENTS),
    },
];

/// Names of the categories in the built-in table
pub fn default_category_names() -> impl Iterator<Item = &'static str> {
    DEFAULT_CATEGORY_RULES.iter().map(|rules| &*rules.category)
}

// ============================================================================
// Scorer
// ============================================================================

/// Scores forecast samples against an extendable category table
#[derive(Debug, Clone)]
pub struct SuitabilityScorer {
    categories: Vec<CategoryRules>,
}

impl Default for SuitabilityScorer {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORY_RULES.to_vec(),
        }
    }
}

impl SuitabilityScorer {
    /// Scorer with no category adjustments at all
    pub fn generic() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Add a category, replacing any existing rules with the same name
    pub fn with_category(mut self, rules: CategoryRules) -> Self {
        self.categories.retain(|r| !r.matches(&rules.category));
        self.categories.push(rules);
        self
    }

    pub fn categories(&self) -> &[CategoryRules] {
        &self.categories
    }

    pub fn score(&self, category: &str, sample: &ForecastSample) -> SuitabilityResult {
        score_with_rules(&self.categories, category, sample)
    }
}

/// Score a sample for an event category using the built-in table
pub fn calculate_suitability(category: &str, sample: &ForecastSample) -> SuitabilityResult {
    score_with_rules(DEFAULT_CATEGORY_RULES, category, sample)
}

fn score_with_rules(
    rules: &[CategoryRules],
    category: &str,
    sample: &ForecastSample,
) -> SuitabilityResult {
    let mut entries = vec![
        temperature_band(sample.temperature),
        precipitation_band(sample.rain_probability),
        wind_band(sample.wind_speed_kmh()),
        sky_band(sample.sky_class()),
    ];
    let mut score: i32 = entries.iter().map(|e| e.points).sum();

    if let Some(category_rules) = rules.iter().find(|r| r.matches(category)) {
        for adjustment in category_rules.adjustments.iter() {
            if (adjustment.applies)(sample) {
                score = score.saturating_sub(adjustment.penalty).max(0);
                entries.push(BreakdownEntry::new(
                    adjustment.factor,
                    adjustment.penalty.saturating_neg(),
                    adjustment.label,
                ));
            }
        }
    }

    let normalized = score.clamp(0, MAX_SCORE);
    SuitabilityResult {
        score: normalized,
        breakdown: Breakdown {
            entries,
            raw_total: score,
            normalized_total: normalized,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(temperature: f64, rain_probability: f64, wind_speed: f64, sky: &str) -> ForecastSample {
        ForecastSample {
            temperature,
            feels_like: temperature,
            min_temp: temperature - 1.0,
            max_temp: temperature + 1.0,
            pressure: 1013,
            humidity: 60,
            wind_speed,
            wind_deg: 200,
            clouds: 10,
            weather_main: sky.to_string(),
            weather_description: sky.to_lowercase(),
            weather_icon: "01d".to_string(),
            rain_probability,
            rain_volume_1h: 0.0,
            rain_volume_3h: 0.0,
            forecast_time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn rendered(result: &SuitabilityResult, factor: &str) -> String {
        result.breakdown.get(factor).map(|e| e.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_perfect_day() {
        let result = calculate_suitability("picnic", &sample(22.0, 0.05, 3.0, "Clear"));
        assert_eq!(result.score, 100);
        assert_eq!(rendered(&result, "temperature_score"), "+30 (Ideal)");
        assert_eq!(rendered(&result, "precipitation_score"), "+25 (Low Rain Risk)");
        assert_eq!(rendered(&result, "wind_score"), "+20 (Low Wind)");
        assert_eq!(rendered(&result, "sky_score"), "+25 (Clear/Cloudy)");
        assert_eq!(result.breakdown.raw_total, 100);
        assert_eq!(result.breakdown.normalized_total, 100);
    }

    #[test]
    fn test_cold_rainy_wedding_floors_at_zero() {
        let result = calculate_suitability("wedding", &sample(8.0, 0.30, 2.0, "Rain"));
        assert_eq!(rendered(&result, "temperature_score"), "0 (Extreme)");
        assert_eq!(rendered(&result, "precipitation_score"), "+10 (Moderate Rain Risk)");
        assert_eq!(rendered(&result, "wind_score"), "+20 (Low Wind)");
        assert_eq!(rendered(&result, "sky_score"), "0 (Poor Sky Condition)");
        assert_eq!(rendered(&result, "wedding_adjustment"), "-20 (Rain for Wedding)");
        assert_eq!(rendered(&result, "wedding_adjustment_temp"), "-15 (Extreme Temp for Wedding)");
        assert_eq!(result.breakdown.raw_total, 0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_temperature_band_edges() {
        assert_eq!(temperature_band(15.0).points, 30);
        assert_eq!(temperature_band(30.0).points, 30);
        assert_eq!(temperature_band(10.0).points, 15);
        assert_eq!(temperature_band(14.9).points, 15);
        assert_eq!(temperature_band(30.1).points, 15);
        assert_eq!(temperature_band(35.0).points, 15);
        assert_eq!(temperature_band(9.9).points, 0);
        assert_eq!(temperature_band(35.1).points, 0);
        assert_eq!(temperature_band(f64::NAN).points, 0);
    }

    #[test]
    fn test_precipitation_band_edges() {
        assert_eq!(precipitation_band(0.0).points, 25);
        assert_eq!(precipitation_band(0.20).points, 25);
        assert_eq!(precipitation_band(0.21).points, 10);
        assert_eq!(precipitation_band(0.50).points, 10);
        assert_eq!(precipitation_band(0.51).points, 0);
        assert_eq!(precipitation_band(1.0).to_string(), "0 (High Rain Risk)");
    }

    #[test]
    fn test_wind_band_edges() {
        assert_eq!(wind_band(19.99).points, 20);
        assert_eq!(wind_band(20.0).points, 10);
        assert_eq!(wind_band(39.99).points, 10);
        assert_eq!(wind_band(40.0).points, 0);
        assert_eq!(wind_band(40.0).to_string(), "0 (High Wind)");
    }

    #[test]
    fn test_sky_band() {
        assert_eq!(sky_band(SkyClass::ReducedVisibility).to_string(), "+5 (Sub-optimal Visibility)");
    }

    #[test]
    fn test_sports_penalties() {
        // 10 m/s = 36 km/h: moderate wind band, above the sports limit
        let windy_mist = sample(20.0, 0.0, 10.0, "Mist");
        let neutral = calculate_suitability("concert", &windy_mist);
        let sports = calculate_suitability("Sports", &windy_mist);

        assert_eq!(neutral.score, 30 + 25 + 10 + 5);
        assert_eq!(sports.score, neutral.score - 25);
        assert_eq!(rendered(&sports, "sports_adjustment"), "-15 (Very High Wind for Sports)");
        assert_eq!(rendered(&sports, "sports_adjustment_sky"), "-10 (Non-ideal Sky for Sports)");
        assert!(!neutral.breakdown.contains("sports_adjustment"));
    }

    #[test]
    fn test_sports_calm_clear_day_unpenalized() {
        let result = calculate_suitability("sports", &sample(22.0, 0.0, 3.0, "Clouds"));
        assert_eq!(result.score, 100);
        assert_eq!(result.breakdown.entries.len(), 4);
    }

    #[test]
    fn test_wedding_light_rain_risk() {
        let result = calculate_suitability("WEDDING", &sample(22.0, 0.15, 3.0, "Clouds"));
        assert_eq!(result.score, 80);
        assert!(result.breakdown.contains("wedding_adjustment"));
        assert!(!result.breakdown.contains("wedding_adjustment_temp"));
    }

    #[test]
    fn test_penalty_recorded_even_when_floored() {
        let result = calculate_suitability("sports", &sample(-20.0, 0.9, 30.0, "Thunderstorm"));
        assert_eq!(result.score, 0);
        assert!(result.breakdown.contains("sports_adjustment"));
        assert!(result.breakdown.contains("sports_adjustment_sky"));
    }

    #[test]
    fn test_breakdown_key_order() {
        let result = calculate_suitability("wedding", &sample(8.0, 0.30, 2.0, "Rain"));
        assert_eq!(
            result.breakdown.keys(),
            vec![
                "temperature_score",
                "precipitation_score",
                "wind_score",
                "sky_score",
                "wedding_adjustment",
                "wedding_adjustment_temp",
                "final_score_raw",
                "final_score_normalized",
            ]
        );
    }

    #[test]
    fn test_custom_category() {
        fn any_cloud(sample: &ForecastSample) -> bool {
            sample.clouds > 5
        }
        let scorer = SuitabilityScorer::default().with_category(CategoryRules::new(
            "stargazing",
            vec![CategoryAdjustment {
                factor: "stargazing_adjustment",
                penalty: 40,
                label: "Clouds Hide the Sky",
                applies: any_cloud,
            }],
        ));

        let s = sample(22.0, 0.0, 3.0, "Clear");
        assert_eq!(scorer.score("Stargazing", &s).score, 60);
        assert_eq!(scorer.score("sports", &s).score, 100);
        assert_eq!(SuitabilityScorer::generic().score("sports", &s), calculate_suitability("other", &s));
    }

    #[test]
    fn test_with_category_replaces_existing() {
        let scorer = SuitabilityScorer::default().with_category(CategoryRules::new("WEDDING", vec![]));
        assert_eq!(scorer.categories().len(), 2);
        let result = scorer.score("wedding", &sample(8.0, 0.30, 2.0, "Rain"));
        assert_eq!(result.score, 30);
    }

    fn always(_: &ForecastSample) -> bool {
        true
    }

    #[test]
    fn test_extreme_penalties_stay_bounded() {
        let clear = sample(22.0, 0.0, 2.0, "Clear");
        for penalty in [i32::MIN, -1, i32::MAX] {
            let scorer = SuitabilityScorer::default().with_category(CategoryRules::new(
                "stress",
                vec![
                    CategoryAdjustment {
                        factor: "stress_adjustment",
                        penalty,
                        label: "Stress",
                        applies: always,
                    },
                    CategoryAdjustment {
                        factor: "stress_adjustment_again",
                        penalty,
                        label: "Stress Again",
                        applies: always,
                    },
                ],
            ));
            let result = scorer.score("stress", &clear);
            assert!((0..=MAX_SCORE).contains(&result.score));
            assert_eq!(result.breakdown.entries.len(), 6);
        }
    }

    #[test]
    fn test_default_category_names_follow_table() {
        assert_eq!(default_category_names().collect::<Vec<_>>(), vec!["sports", "wedding"]);
    }
}
