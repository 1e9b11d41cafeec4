use crate::models::trip_request::TripRequest;

const DEFAULT_BUDGET: &str = "moderate";
const DEFAULT_TRAVELERS: u32 = 1;

const OUTPUT_SCHEMA: &str = r#"{
  "destination": "City, Country",
  "tripType": "Type of trip",
  "startDate": "YYYY-MM-DD",
  "endDate": "YYYY-MM-DD",
  "totalDays": number,
  "costEstimate": {
    "low": number,
    "high": number,
    "currency": "USD"
  },
  "weather": [
    { "day": 1, "temp": number, "condition": "Weather condition", "icon": "emoji" }
  ],
  "days": [
    {
      "day": number,
      "title": "Day title",
      "activities": [
        {
          "time": "HH:MM AM/PM",
          "title": "Activity title",
          "description": "Activity description",
          "location": { "lat": number, "lng": number },
          "type": "attraction/restaurant/hotel/coffee",
          "cost": number
        }
      ]
    }
  ]
}"#;

/// Renders the instruction sent to the completion service.
///
/// Deterministic: the same request always yields the same bytes. Optional
/// form fields are filled with their defaults so every line has a value.
pub fn build_prompt(request: &TripRequest) -> String {
    let trip_type = request.trip_type.unwrap_or_default();
    let food_preference = request.food_preference.unwrap_or_default();
    let budget = request
        .budget
        .map(|b| b.to_string())
        .unwrap_or_else(|| DEFAULT_BUDGET.to_string());
    let travelers = request.travelers.unwrap_or(DEFAULT_TRAVELERS);

    let mut prompt = String::new();
    prompt.push_str(&format!(
        "Create a detailed travel itinerary for a trip to {}.\n",
        request.destination.trim()
    ));
    prompt.push_str(&format!("Trip type: {}\n", trip_type.as_str()));
    prompt.push_str(&format!("Start date: {}\n", request.start_date.format("%Y-%m-%d")));
    prompt.push_str(&format!("End date: {}\n", request.end_date.format("%Y-%m-%d")));
    prompt.push_str(&format!("Total days: {}\n", request.trip_days()));
    prompt.push_str(&format!("Number of travelers: {}\n", travelers));
    prompt.push_str(&format!("Budget: {}\n", budget));
    prompt.push_str(&format!("Food preferences: {}\n", food_preference.as_str()));
    prompt.push('\n');
    prompt.push_str(
        "You are a travel planning assistant. Plan every day of the trip with realistic \
         locations, timings and activities, and include geographic coordinates for each activity.\n",
    );
    prompt.push('\n');
    prompt.push_str("Format the response as a valid JSON object with the following structure:\n");
    prompt.push_str(OUTPUT_SCHEMA);
    prompt.push('\n');
    prompt
}
