use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use trip_itinerary_api::config::AppConfig;
use trip_itinerary_api::routes;
use trip_itinerary_api::services::gemini_service::GeminiService;
use trip_itinerary_api::services::itinerary_generation_service::ItineraryGenerator;
use trip_itinerary_api::services::itinerary_state_service::ItineraryStateMachine;
use trip_itinerary_api::services::maps_loader_service::MapLibraryLoader;
use trip_itinerary_api::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let gemini = GeminiService::new(&config.gemini).map_err(|e| {
        error!("Failed to create Gemini client: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;
    info!("Using model {}", config.gemini.model);

    let itineraries = Arc::new(ItineraryStateMachine::new(ItineraryGenerator::new(Arc::new(gemini))));
    let maps = MapLibraryLoader::new(config.maps_api_key.clone());
    let availability = maps.capability().await;

    let state = web::Data::new(AppState::new(
        itineraries,
        maps,
        availability,
        config.gemini.model.clone(),
    ));

    info!("Attempting to bind to {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((config.host, config.port))?
    .run()
    .await
}
