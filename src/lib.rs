pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use services::itinerary_state_service::ItineraryStateMachine;
use services::map_sync_service::MapSyncController;
use services::map_widget::ViewportMap;
use services::maps_loader_service::{MapAvailability, MapLibraryLoader};

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub itineraries: Arc<ItineraryStateMachine>,
    pub maps: MapLibraryLoader,
    pub model: String,
    map: Mutex<MapSyncController<ViewportMap>>,
}

impl AppState {
    pub fn new(
        itineraries: Arc<ItineraryStateMachine>,
        maps: MapLibraryLoader,
        availability: MapAvailability,
        model: impl Into<String>,
    ) -> Self {
        Self {
            itineraries,
            maps,
            model: model.into(),
            map: Mutex::new(MapSyncController::new(ViewportMap::default(), availability)),
        }
    }

    pub fn map(&self) -> MutexGuard<'_, MapSyncController<ViewportMap>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
