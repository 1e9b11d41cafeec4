use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::location::LatLng;

// Model output is loosely typed: numbers arrive as strings, integers as
// floats, and optional objects as half-filled maps. These deserializers
// coerce what they can and default the rest.

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn rounded_u32_from_value(value: &Value) -> Option<u32> {
    number_from_value(value)
        .filter(|f| *f >= 0.0 && *f <= u32::MAX as f64)
        .map(|f| f.ceil() as u32)
}

pub(crate) fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

fn deserialize_non_negative_cost<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let cost = deserialize_lenient_f64(deserializer)?;
    Ok(cost.max(0.0))
}

// Custom deserializer for integer fields the model may emit as floats
pub(crate) fn deserialize_lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(rounded_u32_from_value(&value).unwrap_or(0))
}

// Like `deserialize_lenient_u32`, but the value must be a 1-based day number
pub(crate) fn deserialize_day_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match rounded_u32_from_value(&value) {
        Some(day) if day >= 1 => Ok(day),
        _ => Err(serde::de::Error::custom(format!(
            "expected a day number >= 1, got {}",
            value
        ))),
    }
}

fn deserialize_optional_location<'de, D>(deserializer: D) -> Result<Option<LatLng>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let location = match &value {
        Value::Object(map) => {
            let lat = map.get("lat").and_then(number_from_value);
            let lng = map
                .get("lng")
                .or_else(|| map.get("lon"))
                .and_then(number_from_value);
            match (lat, lng) {
                (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
                _ => None,
            }
        }
        _ => None,
    };
    Ok(location.filter(LatLng::is_valid))
}

pub(crate) fn deserialize_null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// What an activity is, used for its timeline icon.
///
/// Anything the model sends outside the four known kinds (including a
/// missing `type`) lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Attraction,
    Restaurant,
    Hotel,
    Coffee,
    #[default]
    Other,
}

impl ActivityKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "attraction" => ActivityKind::Attraction,
            "restaurant" => ActivityKind::Restaurant,
            "hotel" => ActivityKind::Hotel,
            "coffee" => ActivityKind::Coffee,
            _ => ActivityKind::Other,
        }
    }

    pub fn icon(&self) -> ActivityIcon {
        match self {
            ActivityKind::Restaurant => ActivityIcon::new("utensils", "text-orange-500"),
            ActivityKind::Attraction => ActivityIcon::new("camera", "text-blue-500"),
            ActivityKind::Hotel => ActivityIcon::new("bed", "text-indigo-500"),
            ActivityKind::Coffee => ActivityIcon::new("coffee", "text-blue-700"),
            ActivityKind::Other => ActivityIcon::new("map-pin", "text-gray-500"),
        }
    }
}

impl<'de> Deserialize<'de> for ActivityKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(ActivityKind::from_label)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityIcon {
    pub glyph: &'static str,
    pub color: &'static str,
}

impl ActivityIcon {
    const fn new(glyph: &'static str, color: &'static str) -> Self {
        Self { glyph, color }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Display string such as "09:00 AM"; never parsed.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_location",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<LatLng>,
    #[serde(rename = "type", default)]
    pub kind: ActivityKind,
    #[serde(default, deserialize_with = "deserialize_non_negative_cost")]
    pub cost: f64,
}

impl Activity {
    pub fn is_mappable(&self) -> bool {
        self.location.is_some()
    }

    /// "25 EUR"; free activities have no label.
    pub fn cost_label(&self, currency: &str) -> Option<String> {
        if self.cost > 0.0 {
            Some(format!("{} {}", format_amount(self.cost), currency))
        } else {
            None
        }
    }
}

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{:.2}", amount)
    }
}
