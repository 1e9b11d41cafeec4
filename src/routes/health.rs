use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::services::maps_loader_service::MapAvailability;
use crate::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

/*
    /health
*/
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    health.services.insert(
        "gemini".to_string(),
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Model {}", data.model)),
        },
    );

    // A missing map only degrades the page; itineraries still work
    let maps = match data.map().availability() {
        MapAvailability::Available(library) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Libraries: {}", library.libraries.join(", "))),
        },
        MapAvailability::Unavailable(reason) => ServiceStatus {
            status: "error".to_string(),
            details: Some(reason.clone()),
        },
    };
    if maps.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("maps".to_string(), maps);

    HttpResponse::Ok().json(health)
}
