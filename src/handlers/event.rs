use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::participant;
use crate::models::*;
use crate::services::EventService;

#[utoipa::path(
    post,
    path = "/events",
    tag = "event",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event created; the admin secret is only returned here", body = CreatedEventResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 409, description = "Admin PIN already in use", body = ApiError)
    )
)]
pub async fn create_event(
    service: web::Data<EventService>,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    match service.create_event(request.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{event_code}",
    tag = "event",
    params(
        ("event_code" = String, Path, description = "Public event code (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Public event page", body = PublicEventResponse),
        (status = 404, description = "Unknown event code", body = ApiError)
    )
)]
pub async fn get_event(
    service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.get_public_event(&path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn event_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::post().to(create_event))
            .route("/{event_code}", web::get().to(get_event))
            .route("/{event_code}/participants", web::post().to(participant::register)),
    );
}
