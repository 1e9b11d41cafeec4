use actix_web::{web, HttpResponse, Responder};
use log::warn;
use serde_json::json;

use crate::AppState;

/*
    /api/maps/library
*/
pub async fn library(data: web::Data<AppState>) -> impl Responder {
    match data.maps.load_map_library().await {
        Ok(library) => HttpResponse::Ok().json(library.as_ref()),
        Err(err) => {
            warn!("Map library requested but unavailable: {}", err);
            HttpResponse::ServiceUnavailable().json(json!({ "error": err.to_string() }))
        }
    }
}
