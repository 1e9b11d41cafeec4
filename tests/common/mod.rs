#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

use trip_itinerary_api::errors::FetchError;
use trip_itinerary_api::routes;
use trip_itinerary_api::services::itinerary_fetcher::{CompletionRequest, ItineraryFetcher};
use trip_itinerary_api::services::itinerary_generation_service::ItineraryGenerator;
use trip_itinerary_api::services::itinerary_state_service::{ItineraryState, ItineraryStateMachine};
use trip_itinerary_api::services::maps_loader_service::MapLibraryLoader;
use trip_itinerary_api::AppState;

pub const MAPS_TEST_KEY: &str = "maps-test-key";

/// Replays canned completions in order.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<String, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<Result<String, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItineraryFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        _request: CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("no more scripted responses".into())))
    }
}

/// Answers after a per-destination delay and ignores cancellation, so a
/// superseded request still delivers its result late.
pub struct DelayedFetcher {
    routes: Vec<(String, Duration)>,
}

impl DelayedFetcher {
    pub fn new(routes: &[(&str, u64)]) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|(destination, millis)| (destination.to_string(), Duration::from_millis(*millis)))
                .collect(),
        }
    }
}

#[async_trait]
impl ItineraryFetcher for DelayedFetcher {
    async fn fetch(
        &self,
        request: CompletionRequest,
        _cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let (destination, delay) = self
            .routes
            .iter()
            .find(|(destination, _)| request.prompt.contains(&format!("trip to {}.", destination)))
            .cloned()
            .ok_or_else(|| FetchError::Network("unknown destination".into()))?;
        sleep(delay).await;
        Ok(format!("```json\n{}\n```", minimal_itinerary(&destination)))
    }
}

pub fn paris_itinerary() -> Value {
    json!({
        "destination": "Paris, France",
        "tripType": "Leisure",
        "startDate": "2025-06-01",
        "endDate": "2025-06-03",
        "totalDays": 3,
        "costEstimate": { "low": 1500, "high": 2500, "currency": "USD" },
        "weather": [
            { "day": 1, "temp": 24, "condition": "Sunny", "icon": "☀️" },
            { "day": 2, "temp": 21, "condition": "Cloudy", "icon": "☁️" },
            { "day": 3, "temp": 19, "condition": "Light rain", "icon": "🌧️" }
        ],
        "days": [
            {
                "day": 1,
                "title": "Icons of Paris",
                "activities": [
                    { "time": "09:00 AM", "title": "Eiffel Tower", "description": "Summit views",
                      "location": { "lat": 48.8584, "lng": 2.2945 }, "type": "attraction", "cost": 30 },
                    { "time": "12:30 PM", "title": "Café lunch", "description": "Croque monsieur",
                      "location": { "lat": 48.8566, "lng": 2.3030 }, "type": "restaurant", "cost": 25 },
                    { "time": "03:00 PM", "title": "Seine walk", "description": "Along the quays",
                      "type": "attraction", "cost": 0 }
                ]
            },
            {
                "day": 2,
                "title": "Museums",
                "activities": [
                    { "time": "10:00 AM", "title": "Louvre", "description": "Mona Lisa",
                      "location": { "lat": 48.8606, "lng": 2.3376 }, "type": "attraction", "cost": 22 },
                    { "time": "04:00 PM", "title": "Musée d'Orsay", "description": "Impressionists",
                      "location": { "lat": 48.8600, "lng": 2.3266 }, "type": "attraction", "cost": 16 }
                ]
            },
            {
                "day": 3,
                "title": "Slow morning",
                "activities": [
                    { "time": "09:30 AM", "title": "Hotel breakfast", "description": "Pastries",
                      "type": "hotel", "cost": 0 }
                ]
            }
        ]
    })
}

/// A typical model answer: prose around a fenced payload.
pub fn paris_completion() -> String {
    format!(
        "Here is your itinerary for Paris!\n\n```json\n{}\n```\n\nEnjoy your trip.",
        serde_json::to_string_pretty(&paris_itinerary()).unwrap()
    )
}

pub fn minimal_itinerary(destination: &str) -> String {
    json!({
        "destination": destination,
        "totalDays": 1,
        "days": [{ "day": 1, "title": destination, "activities": [] }]
    })
    .to_string()
}

pub fn trip_request_json(destination: &str) -> Value {
    json!({
        "destination": destination,
        "startDate": "2025-06-01",
        "endDate": "2025-06-03",
        "tripType": "Leisure",
        "budget": 1500,
        "travelers": 2,
        "foodPreference": "any"
    })
}

pub fn state_machine(fetcher: Arc<dyn ItineraryFetcher>) -> Arc<ItineraryStateMachine> {
    Arc::new(ItineraryStateMachine::new(ItineraryGenerator::new(fetcher)))
}

/// Polls until the machine leaves `Loading`.
pub async fn wait_until_settled(machine: &ItineraryStateMachine) -> ItineraryState {
    for _ in 0..200 {
        let state = machine.state();
        if !state.is_loading() {
            return state;
        }
        sleep(Duration::from_millis(10)).await;
    }
    machine.state()
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub async fn new(fetcher: Arc<dyn ItineraryFetcher>) -> Self {
        Self::build(fetcher, Some(MAPS_TEST_KEY.to_string())).await
    }

    pub async fn without_maps(fetcher: Arc<dyn ItineraryFetcher>) -> Self {
        Self::build(fetcher, None).await
    }

    pub async fn with_responses(responses: Vec<Result<String, FetchError>>) -> Self {
        Self::new(Arc::new(ScriptedFetcher::new(responses))).await
    }

    async fn build(fetcher: Arc<dyn ItineraryFetcher>, maps_key: Option<String>) -> Self {
        let maps = MapLibraryLoader::new(maps_key);
        let availability = maps.capability().await;
        let state = AppState::new(state_machine(fetcher), maps, availability, "gemini-test");
        Self {
            state: web::Data::new(state),
        }
    }

    pub async fn settled(&self) -> ItineraryState {
        wait_until_settled(&self.state.itineraries).await
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}
