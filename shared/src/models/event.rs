//! Planned event models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::scoring::DEFAULT_CATEGORY_RULES;
use crate::validation::validate_not_blank;

/// Input for creating or updating an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EventInput {
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    /// Free-form category, e.g. `sports`, `wedding`, `picnic`
    #[serde(rename = "type")]
    #[validate(custom = "validate_not_blank")]
    pub event_type: String,

    /// Free-text place name, resolved through geocoding
    #[serde(alias = "location_name")]
    #[validate(custom = "validate_not_blank")]
    pub location: String,

    pub event_date: NaiveDate,
}

impl EventInput {
    /// Whether the built-in table has dedicated scoring rules for the category.
    /// Any other category is accepted and scored with the generic bands only.
    pub fn has_category_rules(&self) -> bool {
        DEFAULT_CATEGORY_RULES
            .iter()
            .any(|rules| rules.matches(&self.event_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, event_type: &str, location: &str) -> EventInput {
        EventInput {
            name: name.to_string(),
            event_type: event_type.to_string(),
            location: location.to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input("Beach Party", "party", "Miami Beach, FL").validate().is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let errors = input("  ", "sports", "").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("location"));
        assert!(!fields.contains_key("event_type"));
    }

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{"name":"Final","type":"Sports","location_name":"Wembley","event_date":"2024-07-20"}"#;
        let parsed: EventInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.event_type, "Sports");
        assert_eq!(parsed.location, "Wembley");
        assert!(parsed.has_category_rules());
    }

    #[test]
    fn test_category_rules_follow_scorer_table() {
        for name in crate::scoring::default_category_names() {
            assert!(input("Event", &name.to_uppercase(), "Paris").has_category_rules());
        }
        assert!(!input("Event", "picnic", "Paris").has_category_rules());
    }
}
