use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::participant_entity;

use super::{EventDetails, ShareLinks};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegisterParticipantRequest {
    #[schema(example = "Anna")]
    pub name: String,
    #[schema(example = "anna@example.de")]
    pub email: String,
    pub wishlist: Option<String>,
    #[schema(example = "🦊")]
    pub avatar: Option<String>,
    /// Optional 4-digit PIN for logging back in with event code + email
    #[schema(example = "1234")]
    pub personal_pin: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisteredParticipantResponse {
    pub participant: OwnParticipantResponse,
    pub secret_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ShareLinks>,
}

/// What other visitors of the event page see
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicParticipantResponse {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

impl From<&participant_entity::Model> for PublicParticipantResponse {
    fn from(m: &participant_entity::Model) -> Self {
        PublicParticipantResponse {
            id: m.id,
            name: m.name.clone(),
            avatar: m.avatar.clone(),
        }
    }
}

/// Roster entry for the admin. Never carries the recipient.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminParticipantResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub wishlist: Option<String>,
    pub avatar: String,
    pub has_assignment: bool,
    pub created_at: DateTime<Utc>,
}

impl AdminParticipantResponse {
    pub fn new(m: &participant_entity::Model, has_assignment: bool) -> Self {
        AdminParticipantResponse {
            id: m.id,
            name: m.name.clone(),
            email: m.email.clone(),
            wishlist: m.wishlist.clone(),
            avatar: m.avatar.clone(),
            has_assignment,
            created_at: m.created_at,
        }
    }
}

/// The holder's own profile
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OwnParticipantResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub wishlist: Option<String>,
    pub avatar: String,
    pub has_personal_pin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&participant_entity::Model> for OwnParticipantResponse {
    fn from(m: &participant_entity::Model) -> Self {
        OwnParticipantResponse {
            id: m.id,
            name: m.name.clone(),
            email: m.email.clone(),
            wishlist: m.wishlist.clone(),
            avatar: m.avatar.clone(),
            has_personal_pin: m.personal_pin.is_some(),
            created_at: m.created_at,
        }
    }
}

/// The one participant the holder gives a present to
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReceiverResponse {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub wishlist: Option<String>,
}

impl From<participant_entity::Model> for ReceiverResponse {
    fn from(m: participant_entity::Model) -> Self {
        ReceiverResponse {
            id: m.id,
            name: m.name,
            avatar: m.avatar,
            wishlist: m.wishlist,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantViewResponse {
    pub event: EventDetails,
    pub event_code: String,
    pub me: OwnParticipantResponse,
    pub participant_count: usize,
    /// Present once the event is drawn and the holder was part of the latest draw
    pub receiver: Option<ReceiverResponse>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateWishlistRequest {
    /// Empty or missing clears the wishlist
    pub wishlist: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ParticipantLoginRequest {
    #[schema(example = "k3x9p2qa")]
    pub event_code: String,
    #[schema(example = "anna@example.de")]
    pub email: String,
    #[schema(example = "1234")]
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantLoginResponse {
    pub secret_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ShareLinks>,
}
