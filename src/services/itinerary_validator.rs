use log::warn;
use serde_json::Value;
use std::collections::HashSet;

use crate::errors::ValidationError;
use crate::models::itinerary::Itinerary;

/// Top-level fields the page reads but can render without.
const EXPECTED_FIELDS: [&str; 3] = ["destination", "costEstimate", "weather"];

/// Parses a candidate payload into an `Itinerary`.
///
/// `days` is the only mandatory field because the page indexes into it
/// unconditionally. Other missing or mistyped fields are defaulted.
pub fn validate_itinerary(candidate: &str) -> Result<Itinerary, ValidationError> {
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| ValidationError::MalformedJson(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::SchemaViolation("days".to_string()))?;

    match object.get("days") {
        Some(Value::Array(_)) => {}
        _ => return Err(ValidationError::SchemaViolation("days".to_string())),
    }

    let missing: Vec<&str> = EXPECTED_FIELDS
        .iter()
        .copied()
        .filter(|field| object.get(*field).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        warn!("Itinerary payload is missing {:?}; using defaults", missing);
    }

    let itinerary: Itinerary = serde_json::from_value(value).map_err(|e| {
        warn!("Itinerary days could not be read: {}", e);
        ValidationError::SchemaViolation("days".to_string())
    })?;

    let mut seen = HashSet::new();
    if let Some(duplicate) = itinerary.days.iter().find(|plan| !seen.insert(plan.day)) {
        warn!("Itinerary repeats day {}", duplicate.day);
        return Err(ValidationError::SchemaViolation("days".to_string()));
    }

    Ok(normalize(itinerary))
}

fn normalize(mut itinerary: Itinerary) -> Itinerary {
    let estimate = &itinerary.cost_estimate;
    if estimate.low > estimate.high {
        warn!(
            "Cost estimate range is inverted ({} > {}); swapping",
            estimate.low, estimate.high
        );
    }
    itinerary.cost_estimate = itinerary.cost_estimate.normalized();

    if itinerary.total_days == 0 {
        itinerary.total_days = fallback_total_days(&itinerary);
    }

    itinerary
}

fn fallback_total_days(itinerary: &Itinerary) -> u32 {
    if let (Some(start), Some(end)) = (itinerary.start_date, itinerary.end_date) {
        let span = (end - start).num_days() + 1;
        if span > 0 {
            return u32::try_from(span).unwrap_or(u32::MAX);
        }
    }
    u32::try_from(itinerary.days.len()).unwrap_or(u32::MAX).max(1)
}
