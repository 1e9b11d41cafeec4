pub mod activity;
pub mod itinerary;
pub mod location;
pub mod map;
pub mod trip_request;
