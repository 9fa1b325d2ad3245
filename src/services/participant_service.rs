use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{event_entity as events, participant_entity as participants};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::notifier::{ChangeEvent, ChangeKind, ChangeNotifier, Collection};
use crate::services::access;
use crate::utils::{normalize_avatar, normalize_email, normalize_text, validate_name, validate_pin};

const EMAIL_TAKEN: &str = "This email address is already registered for this event";
const PIN_TAKEN: &str = "This PIN is already used in this event, please choose another one";

#[derive(Clone)]
pub struct ParticipantService {
    pool: DatabaseConnection,
    notifier: ChangeNotifier,
    links: LinkBuilder,
}

impl ParticipantService {
    pub fn new(pool: DatabaseConnection, notifier: ChangeNotifier, links: LinkBuilder) -> Self {
        Self {
            pool,
            notifier,
            links,
        }
    }

    /// Join an event.
    ///
    /// Allowed in both states. Joining after a draw leaves the newcomer
    /// without a recipient until the admin draws again.
    pub async fn register(
        &self,
        event_code: &str,
        request: RegisterParticipantRequest,
    ) -> AppResult<RegisteredParticipantResponse> {
        let event = access::resolve_event_code(&self.pool, event_code).await?;

        let name = validate_name("Name", &request.name)?;
        let email = normalize_email(&request.email)?;
        let wishlist = normalize_text("Wishlist", request.wishlist.as_deref())?;
        let avatar = normalize_avatar(request.avatar.as_deref())?;
        let personal_pin = match request.personal_pin.as_deref().map(str::trim) {
            Some(pin) if !pin.is_empty() => Some(validate_pin(pin)?),
            _ => None,
        };

        let email_taken = participants::Entity::find()
            .filter(participants::Column::EventId.eq(event.id))
            .filter(participants::Column::Email.eq(email.as_str()))
            .count(&self.pool)
            .await?;
        if email_taken > 0 {
            return Err(AppError::DuplicateRegistration(EMAIL_TAKEN.to_string()));
        }

        if let Some(pin) = &personal_pin {
            let pin_taken = participants::Entity::find()
                .filter(participants::Column::EventId.eq(event.id))
                .filter(participants::Column::PersonalPin.eq(pin.as_str()))
                .count(&self.pool)
                .await?;
            if pin_taken > 0 {
                return Err(AppError::DuplicateCredential(PIN_TAKEN.to_string()));
            }
        }

        let secret_token = access::unique_secret_token(&self.pool).await?;

        let participant = participants::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(event.id),
            name: Set(name),
            email: Set(email),
            wishlist: Set(wishlist),
            avatar: Set(avatar),
            secret_token: Set(secret_token.clone()),
            personal_pin: Set(personal_pin),
            created_at: Set(Utc::now()),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_insert_error(e, |msg| {
                if msg.contains("pin") {
                    AppError::DuplicateCredential(PIN_TAKEN.to_string())
                } else if msg.contains("email") {
                    AppError::DuplicateRegistration(EMAIL_TAKEN.to_string())
                } else {
                    AppError::DuplicateCredential("Generated credential collided".to_string())
                }
            })
        })?;

        log::info!(
            "Participant {} joined event {} (state: {})",
            participant.id,
            event.id,
            event.state
        );
        self.notifier.publish(ChangeEvent::new(
            Collection::Participants,
            ChangeKind::Insert,
            event.id,
        ));

        Ok(RegisteredParticipantResponse {
            participant: OwnParticipantResponse::from(&participant),
            links: self.links.participant(&event.event_code, &secret_token),
            secret_token,
        })
    }

    /// Everything the token holder may see: event details, own profile and,
    /// once drawn, their own recipient
    pub async fn participant_view(&self, secret_token: &str) -> AppResult<ParticipantViewResponse> {
        let me = access::resolve_participant_token(&self.pool, secret_token).await?;
        let event = self.event_of(&me).await?;

        let participant_count = participants::Entity::find()
            .filter(participants::Column::EventId.eq(event.id))
            .count(&self.pool)
            .await? as usize;

        let receiver = if event.state.is_drawn() {
            access::receiver_of(&self.pool, &me)
                .await?
                .map(ReceiverResponse::from)
        } else {
            None
        };

        Ok(ParticipantViewResponse {
            event: EventDetails::from(&event),
            event_code: event.event_code,
            me: OwnParticipantResponse::from(&me),
            participant_count,
            receiver,
        })
    }

    /// `receiver_of(token)`: token -> giver -> draw pair -> receiver
    pub async fn receiver_of(&self, secret_token: &str) -> AppResult<ReceiverResponse> {
        let me = access::resolve_participant_token(&self.pool, secret_token).await?;
        let event = self.event_of(&me).await?;
        if !event.state.is_drawn() {
            return Err(AppError::NotFound("The draw has not happened yet".to_string()));
        }

        access::receiver_of(&self.pool, &me)
            .await?
            .map(ReceiverResponse::from)
            .ok_or_else(|| {
                AppError::NotFound("You joined after the draw; no recipient yet".to_string())
            })
    }

    /// Wishlists stay editable in every event state
    pub async fn update_wishlist(
        &self,
        secret_token: &str,
        request: UpdateWishlistRequest,
    ) -> AppResult<OwnParticipantResponse> {
        let me = access::resolve_participant_token(&self.pool, secret_token).await?;
        let wishlist = normalize_text("Wishlist", request.wishlist.as_deref())?;

        let event_id = me.event_id;
        let mut model = me.into_active_model();
        model.wishlist = Set(wishlist);
        let updated = model.update(&self.pool).await?;

        self.notifier.publish(ChangeEvent::new(
            Collection::Participants,
            ChangeKind::Update,
            event_id,
        ));
        Ok(OwnParticipantResponse::from(&updated))
    }

    /// Event code + email + personal PIN -> the participant's own token
    pub async fn login(
        &self,
        request: ParticipantLoginRequest,
    ) -> AppResult<ParticipantLoginResponse> {
        let participant = access::resolve_reentry(
            &self.pool,
            &request.event_code,
            &request.email,
            &request.pin,
        )
        .await?;

        let links = match events::Entity::find_by_id(participant.event_id)
            .one(&self.pool)
            .await?
        {
            Some(event) => self
                .links
                .participant(&event.event_code, &participant.secret_token),
            None => None,
        };

        Ok(ParticipantLoginResponse {
            secret_token: participant.secret_token,
            links,
        })
    }

    async fn event_of(&self, participant: &participants::Model) -> AppResult<events::Model> {
        events::Entity::find_by_id(participant.event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(AppError::credential_miss)
    }
}
