use actix_web::web;

pub mod health;
pub mod itinerary;
pub mod maps;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/itineraries")
                        .route("", web::post().to(itinerary::submit))
                        .route("/current", web::get().to(itinerary::current))
                        .route("/current", web::delete().to(itinerary::cancel))
                        .route("/current/retry", web::post().to(itinerary::retry))
                        .route("/current/days", web::get().to(itinerary::days))
                        .route("/current/days/{day}", web::get().to(itinerary::day_detail))
                        .route("/current/days/{day}/map", web::get().to(itinerary::day_map))
                        .route(
                            "/current/days/{day}/activities/{index}/focus",
                            web::post().to(itinerary::focus_activity),
                        ),
                )
                .route("/maps/library", web::get().to(maps::library)),
        );
}
