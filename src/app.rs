use actix_web::web;
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::handlers;
use crate::models::LinkBuilder;
use crate::notifier::ChangeNotifier;
use crate::services::{DrawService, EventService, ParticipantService};
use crate::utils::DrawEngine;

/// The three services behind the HTTP surface, wired from one config.
#[derive(Clone)]
pub struct AppServices {
    pub events: EventService,
    pub participants: ParticipantService,
    pub draws: DrawService,
}

impl AppServices {
    pub fn new(pool: DatabaseConnection, config: &Config, notifier: ChangeNotifier) -> Self {
        let links = LinkBuilder::new(config.public_base_url.clone());
        let engine = DrawEngine::new(config.draw.max_attempts);

        Self {
            events: EventService::new(pool.clone(), notifier.clone(), links.clone()),
            participants: ParticipantService::new(pool.clone(), notifier.clone(), links),
            draws: DrawService::new(pool, engine, notifier),
        }
    }

    /// Registers the services as app data and mounts `/health` plus the
    /// `/api/v1` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.events.clone()))
            .app_data(web::Data::new(self.participants.clone()))
            .app_data(web::Data::new(self.draws.clone()))
            .configure(handlers::health_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::event_config)
                    .configure(handlers::participant_config)
                    .configure(handlers::admin_config),
            );
    }
}
