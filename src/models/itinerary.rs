use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::activity::{
    deserialize_day_number, deserialize_lenient_f64, deserialize_lenient_string,
    deserialize_lenient_u32, deserialize_null_as_empty, format_amount, Activity, ActivityIcon,
};

pub const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(|s| {
        let s = s.trim();
        // Tolerate full timestamps by keeping the date part
        let date_part = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }))
}

// Drops weather entries that cannot be read instead of failing the itinerary
fn deserialize_weather<'de, D>(deserializer: D) -> Result<Vec<WeatherEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let entries = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<WeatherEntry>(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(entries)
}

/// Anything other than an object (null, a prose string) becomes the default
/// estimate.
fn deserialize_cost_estimate<'de, D>(deserializer: D) -> Result<CostEstimate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => CostEstimate::default(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub low: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub high: f64,
    #[serde(default = "default_currency", deserialize_with = "deserialize_lenient_string")]
    pub currency: String,
}

impl Default for CostEstimate {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 0.0,
            currency: default_currency(),
        }
    }
}

impl CostEstimate {
    /// Restores `low <= high` and fills a blank currency.
    pub fn normalized(mut self) -> Self {
        if self.low > self.high {
            std::mem::swap(&mut self.low, &mut self.high);
        }
        if self.currency.trim().is_empty() {
            self.currency = default_currency();
        }
        self
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {} {}",
            format_amount(self.low),
            format_amount(self.high),
            self.currency
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEntry {
    #[serde(deserialize_with = "deserialize_day_number")]
    pub day: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub temp: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub condition: String,
    /// Emoji glyph.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    #[serde(deserialize_with = "deserialize_day_number")]
    pub day: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub activities: Vec<Activity>,
}

impl DayPlan {
    pub fn located_activities(&self) -> impl Iterator<Item = (usize, &Activity)> {
        self.activities
            .iter()
            .enumerate()
            .filter(|(_, activity)| activity.is_mappable())
    }
}

/// A validated multi-day plan. Built once per successful pipeline run and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub destination: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub trip_type: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub total_days: u32,
    #[serde(default, deserialize_with = "deserialize_cost_estimate")]
    pub cost_estimate: CostEstimate,
    #[serde(default, deserialize_with = "deserialize_weather")]
    pub weather: Vec<WeatherEntry>,
    pub days: Vec<DayPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub day: u32,
    pub title: String,
    pub date_label: Option<String>,
    pub activity_count: usize,
}

/// One timeline row on the day view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub index: usize,
    #[serde(flatten)]
    pub activity: Activity,
    pub icon: ActivityIcon,
    pub cost_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
    pub day: u32,
    pub title: String,
    pub date_label: Option<String>,
    pub weather: Option<WeatherEntry>,
    pub activities: Vec<ActivityEntry>,
}

impl Itinerary {
    pub fn day(&self, day: u32) -> Option<&DayPlan> {
        self.days.iter().find(|plan| plan.day == day)
    }

    /// Calendar date of a 1-based day, counted from `start_date`.
    pub fn day_date(&self, day: u32) -> Option<NaiveDate> {
        let start = self.start_date?;
        let offset = i64::from(day.checked_sub(1)?);
        start.checked_add_signed(Duration::days(offset))
    }

    pub fn day_summaries(&self) -> Vec<DaySummary> {
        self.days
            .iter()
            .map(|plan| DaySummary {
                day: plan.day,
                title: plan.title.clone(),
                date_label: self.day_date(plan.day).map(format_long_date),
                activity_count: plan.activities.len(),
            })
            .collect()
    }

    pub fn day_detail(&self, day: u32) -> Option<DayDetail> {
        let plan = self.day(day)?;
        let currency = &self.cost_estimate.currency;
        Some(DayDetail {
            day,
            title: plan.title.clone(),
            date_label: self.day_date(day).map(format_long_date),
            weather: self.weather.iter().find(|entry| entry.day == day).cloned(),
            activities: plan
                .activities
                .iter()
                .enumerate()
                .map(|(index, activity)| ActivityEntry {
                    index,
                    activity: activity.clone(),
                    icon: activity.kind.icon(),
                    cost_label: activity.cost_label(currency),
                })
                .collect(),
        })
    }
}

/// "Sunday, June 1, 2025"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
