use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::ParticipantService;

#[utoipa::path(
    post,
    path = "/events/{event_code}/participants",
    tag = "participant",
    params(
        ("event_code" = String, Path, description = "Public event code (case-insensitive)")
    ),
    request_body = RegisterParticipantRequest,
    responses(
        (status = 200, description = "Registered; keep the secret token", body = RegisteredParticipantResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 404, description = "Unknown event code", body = ApiError),
        (status = 409, description = "Email or PIN already used in this event", body = ApiError)
    )
)]
pub async fn register(
    service: web::Data<ParticipantService>,
    path: web::Path<String>,
    request: web::Json<RegisterParticipantRequest>,
) -> Result<HttpResponse> {
    match service
        .register(&path.into_inner(), request.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/participants/login",
    tag = "participant",
    request_body = ParticipantLoginRequest,
    responses(
        (status = 200, description = "Participant token recovered", body = ParticipantLoginResponse),
        (status = 400, description = "PIN is not 4 digits", body = ApiError),
        (status = 404, description = "No matching registration", body = ApiError)
    )
)]
pub async fn login(
    service: web::Data<ParticipantService>,
    request: web::Json<ParticipantLoginRequest>,
) -> Result<HttpResponse> {
    match service.login(request.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/participants/{token}",
    tag = "participant",
    params(
        ("token" = String, Path, description = "Participant capability token")
    ),
    responses(
        (status = 200, description = "Own view, including the recipient once drawn", body = ParticipantViewResponse),
        (status = 404, description = "Unknown token", body = ApiError)
    )
)]
pub async fn get_view(
    service: web::Data<ParticipantService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.participant_view(&path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/participants/{token}/receiver",
    tag = "participant",
    params(
        ("token" = String, Path, description = "Participant capability token")
    ),
    responses(
        (status = 200, description = "The holder's recipient", body = ReceiverResponse),
        (status = 404, description = "Unknown token or no assignment yet", body = ApiError)
    )
)]
pub async fn get_receiver(
    service: web::Data<ParticipantService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.receiver_of(&path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/participants/{token}/wishlist",
    tag = "participant",
    params(
        ("token" = String, Path, description = "Participant capability token")
    ),
    request_body = UpdateWishlistRequest,
    responses(
        (status = 200, description = "Wishlist saved", body = OwnParticipantResponse),
        (status = 400, description = "Wishlist too long", body = ApiError),
        (status = 404, description = "Unknown token", body = ApiError)
    )
)]
pub async fn update_wishlist(
    service: web::Data<ParticipantService>,
    path: web::Path<String>,
    request: web::Json<UpdateWishlistRequest>,
) -> Result<HttpResponse> {
    match service
        .update_wishlist(&path.into_inner(), request.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// `register` is mounted by `event_config`, under the event's scope
pub fn participant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/participants")
            .route("/login", web::post().to(login))
            .route("/{token}", web::get().to(get_view))
            .route("/{token}/receiver", web::get().to(get_receiver))
            .route("/{token}/wishlist", web::put().to(update_wishlist)),
    );
}
