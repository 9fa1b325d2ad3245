use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::EventState;
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::event::create_event,
        handlers::event::get_event,
        handlers::participant::register,
        handlers::participant::login,
        handlers::participant::get_view,
        handlers::participant::get_receiver,
        handlers::participant::update_wishlist,
        handlers::admin::admin_login,
        handlers::admin::admin_dashboard,
        handlers::admin::run_draw,
    ),
    components(
        schemas(
            EventState,
            EventDetails,
            CreateEventRequest,
            CreatedEventResponse,
            PublicEventResponse,
            AdminDashboardResponse,
            AdminLoginRequest,
            AdminLoginResponse,
            RegisterParticipantRequest,
            RegisteredParticipantResponse,
            PublicParticipantResponse,
            AdminParticipantResponse,
            OwnParticipantResponse,
            ReceiverResponse,
            ParticipantViewResponse,
            UpdateWishlistRequest,
            ParticipantLoginRequest,
            ParticipantLoginResponse,
            DrawSummaryResponse,
            ShareLinks,
            ApiError,
        )
    ),
    tags(
        (name = "event", description = "Event creation and public event pages"),
        (name = "participant", description = "Registration and the participant's own view"),
        (name = "admin", description = "Organizer dashboard and the draw"),
    ),
    info(
        title = "Wichtel Backend API",
        version = "1.0.0",
        description = "Secret Santa events: registration, draw and recipient lookup. \
                       Admin secrets and participant tokens are bearer credentials carried in the path."
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/events",
            "/events/{event_code}",
            "/events/{event_code}/participants",
            "/participants/login",
            "/participants/{token}",
            "/participants/{token}/receiver",
            "/participants/{token}/wishlist",
            "/admin/login",
            "/admin/{admin_secret}",
            "/admin/{admin_secret}/draw",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
