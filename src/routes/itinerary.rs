use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::models::itinerary::{DaySummary, Itinerary};
use crate::models::trip_request::TripRequest;
use crate::services::itinerary_state_service::ItineraryState;
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    request_id: u64,
    state: ItineraryState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DaysResponse<'a> {
    destination: &'a str,
    cost_label: String,
    days: Vec<DaySummary>,
}

fn not_ready(state: ItineraryState) -> HttpResponse {
    HttpResponse::Conflict().json(json!({
        "error": "No itinerary is ready",
        "state": state,
    }))
}

fn ready_itinerary(data: &AppState) -> Result<Arc<Itinerary>, HttpResponse> {
    let state = data.itineraries.state();
    match state.itinerary() {
        Some(itinerary) => Ok(Arc::clone(itinerary)),
        None => Err(not_ready(state)),
    }
}

fn day_not_found(day: u32) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": format!("Day {} not found", day) }))
}

/*
    /api/itineraries
*/
pub async fn submit(
    data: web::Data<AppState>,
    input: Option<web::Json<TripRequest>>,
) -> impl Responder {
    let Some(request) = input.map(web::Json::into_inner) else {
        let request_id = data.itineraries.submit(None);
        return HttpResponse::BadRequest().json(SubmitResponse {
            request_id,
            state: data.itineraries.state(),
        });
    };

    if let Err(err) = request.validate() {
        warn!("Rejected trip request: {}", err);
        return HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    }

    let request_id = data.itineraries.submit(Some(request));
    HttpResponse::Accepted().json(SubmitResponse {
        request_id,
        state: data.itineraries.state(),
    })
}

/*
    /api/itineraries/current
*/
pub async fn current(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.itineraries.state())
}

/*
    /api/itineraries/current/retry
*/
pub async fn retry(data: web::Data<AppState>) -> impl Responder {
    match data.itineraries.retry() {
        Some(request_id) => HttpResponse::Accepted().json(SubmitResponse {
            request_id,
            state: data.itineraries.state(),
        }),
        None => HttpResponse::Conflict().json(json!({ "error": "Nothing to retry" })),
    }
}

/*
    /api/itineraries/current (DELETE)
*/
pub async fn cancel(data: web::Data<AppState>) -> impl Responder {
    data.itineraries.cancel();
    data.map().reset();
    info!("Itinerary view closed");
    HttpResponse::NoContent().finish()
}

/*
    /api/itineraries/current/days
*/
pub async fn days(data: web::Data<AppState>) -> impl Responder {
    let itinerary = match ready_itinerary(&data) {
        Ok(itinerary) => itinerary,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(DaysResponse {
        destination: &itinerary.destination,
        cost_label: itinerary.cost_estimate.label(),
        days: itinerary.day_summaries(),
    })
}

/*
    /api/itineraries/current/days/{day}
*/
pub async fn day_detail(path: web::Path<u32>, data: web::Data<AppState>) -> impl Responder {
    let day = path.into_inner();
    let itinerary = match ready_itinerary(&data) {
        Ok(itinerary) => itinerary,
        Err(response) => return response,
    };

    match itinerary.day_detail(day) {
        Some(detail) => HttpResponse::Ok().json(detail),
        None => day_not_found(day),
    }
}

/*
    /api/itineraries/current/days/{day}/map
*/
pub async fn day_map(path: web::Path<u32>, data: web::Data<AppState>) -> impl Responder {
    let day = path.into_inner();
    let itinerary = match ready_itinerary(&data) {
        Ok(itinerary) => itinerary,
        Err(response) => {
            data.map().reset();
            return response;
        }
    };
    if itinerary.day(day).is_none() {
        return day_not_found(day);
    }

    let view = data.map().select_day(&itinerary, day);
    HttpResponse::Ok().json(view)
}

/*
    /api/itineraries/current/days/{day}/activities/{index}/focus
*/
pub async fn focus_activity(
    path: web::Path<(u32, usize)>,
    data: web::Data<AppState>,
) -> impl Responder {
    let (day, index) = path.into_inner();
    let itinerary = match ready_itinerary(&data) {
        Ok(itinerary) => itinerary,
        Err(response) => return response,
    };
    if itinerary.day(day).is_none() {
        return day_not_found(day);
    }

    let mut map = data.map();
    map.select_day(&itinerary, day);
    match map.show_on_map(index) {
        Some(focus) => HttpResponse::Ok().json(focus),
        None => HttpResponse::NotFound().json(json!({
            "error": format!("Activity {} on day {} has no map location", index, day)
        })),
    }
}
