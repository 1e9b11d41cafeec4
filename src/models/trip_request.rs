use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::TripRequestError;

pub const MIN_TRAVELERS: u32 = 1;
pub const MAX_TRAVELERS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TripType {
    #[default]
    Leisure,
    Adventure,
    Business,
    Honeymoon,
    Family,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::Leisure => "Leisure",
            TripType::Adventure => "Adventure",
            TripType::Business => "Business",
            TripType::Honeymoon => "Honeymoon",
            TripType::Family => "Family",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodPreference {
    #[default]
    Any,
    Veg,
    NonVeg,
    Vegan,
    Jain,
}

impl FoodPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodPreference::Any => "any",
            FoodPreference::Veg => "veg",
            FoodPreference::NonVeg => "non-veg",
            FoodPreference::Vegan => "vegan",
            FoodPreference::Jain => "jain",
        }
    }
}

/// Trip preferences submitted by the planning form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_type: Option<TripType>,
    /// USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travelers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_preference: Option<FoodPreference>,
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            trip_type: None,
            budget: None,
            travelers: None,
            food_preference: None,
        }
    }

    pub fn validate(&self) -> Result<(), TripRequestError> {
        if self.destination.trim().is_empty() {
            return Err(TripRequestError::EmptyDestination);
        }
        if self.end_date < self.start_date {
            return Err(TripRequestError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if let Some(budget) = self.budget {
            if !(budget > 0.0 && budget.is_finite()) {
                return Err(TripRequestError::NonPositiveBudget(budget));
            }
        }
        if let Some(travelers) = self.travelers {
            if !(MIN_TRAVELERS..=MAX_TRAVELERS).contains(&travelers) {
                return Err(TripRequestError::TravelersOutOfRange(travelers));
            }
        }
        Ok(())
    }

    /// Inclusive day count between start and end.
    pub fn trip_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_deserialize_form_payload() {
        let request: TripRequest = serde_json::from_value(json!({
            "destination": "Paris, France",
            "startDate": "2025-06-01",
            "endDate": "2025-06-03",
            "tripType": "Honeymoon",
            "budget": 1500,
            "travelers": 2,
            "foodPreference": "non-veg"
        }))
        .unwrap();

        assert_eq!(request.trip_type, Some(TripType::Honeymoon));
        assert_eq!(request.food_preference, Some(FoodPreference::NonVeg));
        assert_eq!(request.trip_days(), 3);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_optional_fields_may_be_omitted() {
        let request: TripRequest = serde_json::from_value(json!({
            "destination": "Lisbon",
            "startDate": "2025-09-10",
            "endDate": "2025-09-10"
        }))
        .unwrap();
        assert_eq!(request.trip_type, None);
        assert_eq!(request.trip_days(), 1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let base = TripRequest::new("Rome", date("2025-05-01"), date("2025-05-04"));

        let mut blank = base.clone();
        blank.destination = "   ".to_string();
        assert_eq!(blank.validate(), Err(TripRequestError::EmptyDestination));

        let backwards = TripRequest::new("Rome", date("2025-05-04"), date("2025-05-01"));
        assert!(matches!(
            backwards.validate(),
            Err(TripRequestError::EndBeforeStart { .. })
        ));

        let mut broke = base.clone();
        broke.budget = Some(0.0);
        assert_eq!(broke.validate(), Err(TripRequestError::NonPositiveBudget(0.0)));

        let mut crowd = base;
        crowd.travelers = Some(21);
        assert_eq!(crowd.validate(), Err(TripRequestError::TravelersOutOfRange(21)));
    }
}
