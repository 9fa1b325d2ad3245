use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::{DrawService, EventService};

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Admin secret recovered", body = AdminLoginResponse),
        (status = 400, description = "PIN is not 4 digits", body = ApiError),
        (status = 404, description = "Unknown PIN", body = ApiError)
    )
)]
pub async fn admin_login(
    service: web::Data<EventService>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse> {
    match service.admin_login(request.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/{admin_secret}",
    tag = "admin",
    params(
        ("admin_secret" = String, Path, description = "Admin capability token")
    ),
    responses(
        (status = 200, description = "Event configuration and roster", body = AdminDashboardResponse),
        (status = 404, description = "Unknown admin secret", body = ApiError)
    )
)]
pub async fn admin_dashboard(
    service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.admin_dashboard(&path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/{admin_secret}/draw",
    tag = "admin",
    params(
        ("admin_secret" = String, Path, description = "Admin capability token")
    ),
    responses(
        (status = 200, description = "Draw completed; any earlier draw was replaced", body = DrawSummaryResponse),
        (status = 404, description = "Unknown admin secret", body = ApiError),
        (status = 422, description = "Fewer than 2 participants", body = ApiError),
        (status = 500, description = "Draw could not be completed", body = ApiError)
    )
)]
/// Runs the draw, replacing any earlier one
pub async fn run_draw(
    service: web::Data<DrawService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.run_draw(&path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/login", web::post().to(admin_login))
            .route("/{admin_secret}", web::get().to(admin_dashboard))
            .route("/{admin_secret}/draw", web::post().to(run_draw)),
    );
}
