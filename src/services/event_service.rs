use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::HashSet;
use uuid::Uuid;

use crate::entities::{
    EventState, draw_entity as draws, event_entity as events, participant_entity as participants,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::notifier::{ChangeEvent, ChangeKind, ChangeNotifier, Collection};
use crate::services::access;
use crate::utils::{normalize_text, validate_budget, validate_name, validate_pin};

const PIN_TAKEN: &str = "This PIN is already in use, please choose another one";

#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
    notifier: ChangeNotifier,
    links: LinkBuilder,
}

impl EventService {
    pub fn new(pool: DatabaseConnection, notifier: ChangeNotifier, links: LinkBuilder) -> Self {
        Self {
            pool,
            notifier,
            links,
        }
    }

    /// Create an event. The admin secret is returned here and nowhere else
    /// (except through the admin PIN login).
    pub async fn create_event(
        &self,
        request: CreateEventRequest,
    ) -> AppResult<CreatedEventResponse> {
        let name = validate_name("Event name", &request.name)?;
        let budget = validate_budget(request.budget)?;
        let rules = normalize_text("Rules", request.rules.as_deref())?;

        // admin_pin is globally unique; the unique index catches racing inserts
        let admin_pin = match request.admin_pin.as_deref().map(str::trim) {
            Some(pin) if !pin.is_empty() => {
                let pin = validate_pin(pin)?;
                let pin_taken = events::Entity::find()
                    .filter(events::Column::AdminPin.eq(pin.as_str()))
                    .count(&self.pool)
                    .await?;
                if pin_taken > 0 {
                    return Err(AppError::DuplicateCredential(PIN_TAKEN.to_string()));
                }
                pin
            }
            _ => access::unique_admin_pin(&self.pool).await?,
        };

        let event_code = access::unique_event_code(&self.pool).await?;
        let admin_secret = access::unique_admin_secret(&self.pool).await?;

        let event = events::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            date: Set(request.date),
            budget: Set(budget),
            rules: Set(rules),
            state: Set(EventState::Open),
            event_code: Set(event_code.clone()),
            admin_secret: Set(admin_secret.clone()),
            admin_pin: Set(admin_pin.clone()),
            drawn_at: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_insert_error(e, |msg| {
                if msg.contains("admin_pin") {
                    AppError::DuplicateCredential(PIN_TAKEN.to_string())
                } else {
                    AppError::DuplicateCredential("Generated credential collided".to_string())
                }
            })
        })?;

        log::info!("Event {} created ({})", event.id, event.event_code);
        self.notifier.publish(ChangeEvent::new(
            Collection::Events,
            ChangeKind::Insert,
            event.id,
        ));

        Ok(CreatedEventResponse {
            event: EventDetails::from(&event),
            links: self.links.admin(&event_code, &admin_secret),
            event_code,
            admin_secret,
            admin_pin,
        })
    }

    /// Public page of an event, looked up by its (case-insensitive) code
    pub async fn get_public_event(&self, event_code: &str) -> AppResult<PublicEventResponse> {
        let event = access::resolve_event_code(&self.pool, event_code).await?;
        let roster = self.roster(event.id).await?;

        Ok(PublicEventResponse {
            event: EventDetails::from(&event),
            participant_count: roster.len(),
            participants: roster.iter().map(PublicParticipantResponse::from).collect(),
            links: self.links.event(&event.event_code),
            event_code: event.event_code,
        })
    }

    /// Full roster for the admin, without anybody's recipient
    pub async fn admin_dashboard(&self, admin_secret: &str) -> AppResult<AdminDashboardResponse> {
        let event = access::resolve_admin_secret(&self.pool, admin_secret).await?;
        let roster = self.roster(event.id).await?;

        let assigned: HashSet<Uuid> = draws::Entity::find()
            .filter(draws::Column::EventId.eq(event.id))
            .select_only()
            .column(draws::Column::GiverId)
            .into_tuple::<Uuid>()
            .all(&self.pool)
            .await?
            .into_iter()
            .collect();

        let participants: Vec<AdminParticipantResponse> = roster
            .iter()
            .map(|p| AdminParticipantResponse::new(p, assigned.contains(&p.id)))
            .collect();
        let unassigned_count = if event.state.is_drawn() {
            participants.iter().filter(|p| !p.has_assignment).count()
        } else {
            0
        };

        Ok(AdminDashboardResponse {
            event: EventDetails::from(&event),
            participant_count: participants.len(),
            unassigned_count,
            participants,
            links: self.links.admin(&event.event_code, &event.admin_secret),
            event_code: event.event_code,
        })
    }

    /// Recover the admin secret with the admin PIN
    pub async fn admin_login(&self, request: AdminLoginRequest) -> AppResult<AdminLoginResponse> {
        let event = access::resolve_admin_pin(&self.pool, &request.pin).await?;
        log::info!("Admin login for event {}", event.id);

        Ok(AdminLoginResponse {
            links: self.links.admin(&event.event_code, &event.admin_secret),
            admin_secret: event.admin_secret,
            event_code: event.event_code,
        })
    }

    async fn roster(&self, event_id: Uuid) -> AppResult<Vec<participants::Model>> {
        let list = participants::Entity::find()
            .filter(participants::Column::EventId.eq(event_id))
            .order_by_asc(participants::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(list)
    }
}
