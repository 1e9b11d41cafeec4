pub mod gemini_service;
pub mod itinerary_extractor;
pub mod itinerary_fetcher;
pub mod itinerary_generation_service;
pub mod itinerary_state_service;
pub mod itinerary_validator;
pub mod map_sync_service;
pub mod map_widget;
pub mod maps_loader_service;
pub mod prompt_builder;
